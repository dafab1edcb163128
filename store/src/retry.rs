use std::time::Duration;

// first attempt free, each retry doubles the previous delay
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_delay;
        (0..self.max_retries).map(move |attempt| initial * 2u32.saturating_pow(attempt as u32))
    }
}
