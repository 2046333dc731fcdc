use tokio::time::Instant;

#[inline(always)]
pub fn tokio_now() -> Instant {
    Instant::now()
}
