//! services/gateway/src/adapters/proto.rs
//!
//! Generated message types and tonic clients for the backend services.
//! The code is produced by `build.rs` from the files under `proto/`.

pub mod auth {
    tonic::include_proto!("auth");
}

pub mod share {
    tonic::include_proto!("share");
}

pub mod ts {
    tonic::include_proto!("ts");
}

pub mod s3 {
    tonic::include_proto!("s3");
}

pub mod pricetaganalyzer {
    tonic::include_proto!("pricetaganalyzer");
}

pub mod shop_suggestions {
    tonic::include_proto!("shop_suggestions");
}
