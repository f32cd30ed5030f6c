use anyhow::Result;
use readme_skyline::{cli::run_cli, utils::runtime::single_thread_runtime};
use tracing::error;

fn main() -> Result<()> {
    let result = single_thread_runtime()?.block_on(run_cli());

    if let Err(e) = result {
        // Usage problems get clap's formatting and exit code.
        if let Some(clap_error) = e.downcast_ref::<clap::Error>() {
            clap_error.exit();
        }
        error!("Error running cli {e:?}");
        return Err(e);
    }
    Ok(())
}
