fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .compile_protos(&["proto/agriml/v1/agriml.proto"], &["proto"])?;
    Ok(())
}
