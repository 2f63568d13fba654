//! services/gateway/src/adapters/storage.rs
//!
//! Adapter for the `s3.S3` object store. Uploads are client-streaming: each
//! frame carries one chunk plus the content type of the whole object.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use gateway_core::{ChunkSink, ObjectStorage, PortResult, UploadSink};
use tonic::transport::Channel;

use crate::adapters::proto::s3::{s3_client::S3Client, Image, Metadata, Object, UploadResponse};
use crate::adapters::status::transfer_failure;
use crate::adapters::streaming::{ClientStreamingCall, Frames};

#[derive(Clone)]
pub struct GrpcStorageAdapter {
    client: S3Client<Channel>,
}

impl GrpcStorageAdapter {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: S3Client::new(channel),
        }
    }
}

#[async_trait]
impl ObjectStorage for GrpcStorageAdapter {
    async fn open_upload(&self, content_type: &str) -> PortResult<UploadSink> {
        let mut client = self.client.clone();
        let call = ClientStreamingCall::start(move |frames: Frames<Object>| async move {
            // Boxed as `dyn Send` so rustc can prove the outer future is `Send`.
            let reply: BoxFuture<'_, _> = Box::pin(client.upload(frames));
            reply.await
        });
        Ok(Box::new(UploadStream {
            call,
            content_type: content_type.to_string(),
        }))
    }
}

/// One upload in flight.
struct UploadStream {
    call: ClientStreamingCall<Object, UploadResponse>,
    content_type: String,
}

#[async_trait]
impl ChunkSink for UploadStream {
    type Reply = String;

    async fn send(&mut self, chunk: Bytes) -> PortResult<()> {
        let frame = Object {
            image: Some(Image {
                chunk: chunk.to_vec(),
            }),
            meta: Some(Metadata {
                content_type: self.content_type.clone(),
            }),
        };
        self.call.send(frame).await.map_err(transfer_failure)
    }

    async fn close_and_receive(self: Box<Self>) -> PortResult<String> {
        let reply = self.call.close_and_receive().await.map_err(transfer_failure)?;
        Ok(reply.name)
    }
}
