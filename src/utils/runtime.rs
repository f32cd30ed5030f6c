use anyhow::Result;

/// Everything happens after a single awaited request, so one thread is all the tool needs.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
