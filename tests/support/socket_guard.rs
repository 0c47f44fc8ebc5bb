use std::net::TcpListener;
use std::panic::Location;

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var("JSONSTREAM_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Binds a loopback listener, or reports why the calling test is skipped.
#[track_caller]
#[must_use]
pub fn bind_loopback_or_skip() -> Option<TcpListener> {
    let location = Location::caller();
    match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => Some(listener),
        Err(error) => {
            let message = format!(
                "[socket-bound-test] cannot bind localhost socket at {}:{} ({error}); loopback stream test cannot run in this environment",
                location.file(),
                location.line()
            );
            if socket_tests_required() {
                panic!(
                    "{message}. Set JSONSTREAM_REQUIRE_SOCKET_TESTS=0 to allow local skip behavior."
                );
            }
            eprintln!(
                "{message}. Skipping test. Set JSONSTREAM_REQUIRE_SOCKET_TESTS=1 to fail-fast instead."
            );
            None
        }
    }
}
