//! services/gateway/src/adapters/analyzer.rs
//!
//! Adapter for the price tag analyzer. The photo is streamed in chunks and a
//! single structured reply comes back.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use gateway_core::{AnalysisSink, ChunkSink, ImageAnalyzer, ImageInfo, Measure, PortResult};
use tonic::transport::Channel;

use crate::adapters::proto::pricetaganalyzer::{
    price_tag_analyzer_service_client::PriceTagAnalyzerServiceClient, AnalyzeReply, ImageChunk,
};
use crate::adapters::status::transfer_failure;
use crate::adapters::streaming::{ClientStreamingCall, Frames};

#[derive(Clone)]
pub struct GrpcAnalyzerAdapter {
    client: PriceTagAnalyzerServiceClient<Channel>,
}

impl GrpcAnalyzerAdapter {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: PriceTagAnalyzerServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for GrpcAnalyzerAdapter {
    async fn open_analysis(&self) -> PortResult<AnalysisSink> {
        let mut client = self.client.clone();
        let call = ClientStreamingCall::start(move |frames: Frames<ImageChunk>| async move {
            // Boxed as `dyn Send` so rustc can prove the outer future is `Send`.
            let reply: BoxFuture<'_, _> = Box::pin(client.analyze_image(frames));
            reply.await
        });
        Ok(Box::new(AnalysisStream { call }))
    }
}

struct AnalysisStream {
    call: ClientStreamingCall<ImageChunk, AnalyzeReply>,
}

#[async_trait]
impl ChunkSink for AnalysisStream {
    type Reply = ImageInfo;

    async fn send(&mut self, chunk: Bytes) -> PortResult<()> {
        let frame = ImageChunk {
            content: chunk.to_vec(),
        };
        self.call.send(frame).await.map_err(transfer_failure)
    }

    async fn close_and_receive(self: Box<Self>) -> PortResult<ImageInfo> {
        let reply = self.call.close_and_receive().await.map_err(transfer_failure)?;
        Ok(image_info(reply))
    }
}

fn image_info(reply: AnalyzeReply) -> ImageInfo {
    ImageInfo {
        product: reply.product,
        description: reply.description,
        price: reply.price,
        measure: reply.measure.map(|m| Measure {
            amount: m.amount,
            unit: m.unit,
        }),
        attributes: reply.attributes,
    }
}
