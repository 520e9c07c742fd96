use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("Retry attempts exhausted")]
pub struct RetryFailed;

// Run `f` until it succeeds, allowing up to `attempts` retries after the
// first failure.
pub fn retry<T, E, F>(attempts: u32, f: F) -> Result<T, RetryFailed>
where
    F: Fn() -> Result<T, E>,
    E: std::error::Error,
{
    let mut tries_left = attempts;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if tries_left == 0 => {
                warn!("No more retry attempts. Error: {}", err);
                return Err(RetryFailed);
            }
            Err(err) => {
                warn!("Retry triggered. Error: {}", err);
                tries_left -= 1;
            }
        }
    }
}
