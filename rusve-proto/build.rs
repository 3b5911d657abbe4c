use std::env::var;
use std::io::Result;

fn main() -> Result<()> {
    // `main.proto` only aggregates the other three, but every file is listed
    // so that all of them end up in the descriptor set and generated code.
    let proto_files = &[
        "proto/main.proto",
        "proto/users.proto",
        "proto/notes.proto",
        "proto/utils.proto",
    ];

    let proto_folder = "proto";
    let out_dir = var("OUT_DIR").expect("Missing OUT_DIR environment variable");
    let descriptors_path = format!("{}/descriptors.bin", out_dir);

    for file in proto_files {
        println!("cargo:rerun-if-changed={file}");
    }

    tonic_prost_build::configure()
        .file_descriptor_set_path(descriptors_path)
        .protoc_arg("--experimental_allow_proto3_optional")
        .compile_protos(proto_files, &[proto_folder])
        .unwrap();

    Ok(())
}
