/// Consistency check over structures whose invariants span several maps.
pub trait Verify {
    fn verify(&self) -> eyre::Result<()>;
}

// tests share one process, so only the first install wins
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
