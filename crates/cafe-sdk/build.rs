//! Compiles `proto/cafesdk.proto` into tonic client and server stubs.
//!
//! The server half is only used by tests that stand up an in-process sidecar.
//! A vendored `protoc` is used unless `PROTOC` is already set.

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/cafesdk.proto");
    println!("cargo:rerun-if-env-changed=PROTOC");

    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    let includes: Vec<PathBuf> = vec![
        PathBuf::from("proto"),
        protoc_bin_vendored::include_path()?,
    ];

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(&["proto/cafesdk.proto"], &includes)?;

    Ok(())
}
