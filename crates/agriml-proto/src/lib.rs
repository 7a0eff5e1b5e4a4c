//! Generated protobuf types and tonic service stubs for the AgriML APIs.

pub mod agriml {
    pub mod v1 {
        tonic::include_proto!("agriml.v1");
    }
}
