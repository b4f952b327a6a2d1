//! Generates the gRPC client and server code from `proto/container.proto`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto = "proto/container.proto";

    let mut config = prost_build::Config::new();
    let _ = config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos_with_config(config, &[proto], &["proto"])?;

    println!("cargo:rerun-if-changed={proto}");
    Ok(())
}
