use tokio::select;
use tokio_util::sync::CancellationToken;

/// Turns Ctrl-C into a cancellation of the watch loop.
///
/// Windows detached processes can't see console signals, so a detached watch still has to be
/// stopped by closing its console.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
