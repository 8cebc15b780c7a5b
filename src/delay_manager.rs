use std::thread;
use std::time::Duration;
use log::info;

/// Pause between two pages of the same company's search.
pub fn page_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    info!("Waiting for {:.2} seconds (Page Delay)...", delay.as_secs_f64());
    thread::sleep(delay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn zero_delay_returns_immediately() {
        let started = Instant::now();
        page_delay(Duration::ZERO);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn sleeps_for_at_least_the_delay() {
        let started = Instant::now();
        page_delay(Duration::from_millis(20));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
