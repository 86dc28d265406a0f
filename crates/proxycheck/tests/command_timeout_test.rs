//! Administration command timeout, kept in its own test binary so no other
//! test forks while the script is being written.

#![cfg(unix)]

use common::Error;
use proxycheck::{AdminTool, CommandSource, Listing, ListingSource};
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_hanging_command_times_out() {
    let dir = std::env::temp_dir().join(format!("proxycheck-timeout-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let script = dir.join("maxadmin");
    std::fs::write(&script, "#!/bin/sh\nexec sleep 5\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let source = CommandSource::new(AdminTool::Maxadmin, Duration::from_millis(200))
        .with_program(script.to_string_lossy());

    let start = Instant::now();
    let err = source.fetch(Listing::Servers).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }), "unexpected error: {err}");
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(err.to_string().ends_with("timed out after 200ms"));

    let _ = std::fs::remove_dir_all(&dir);
}
