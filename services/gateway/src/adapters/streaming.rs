//! services/gateway/src/adapters/streaming.rs
//!
//! Splits a tonic client-streaming call into separate `send` and
//! `close_and_receive` steps, so the chunked transfer codec can drive it frame
//! by frame.

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tonic::{Response, Status};

pub type Frames<M> = Pin<Box<dyn Stream<Item = M> + Send>>;

type Call<R> = JoinHandle<Result<Response<R>, Status>>;

/// A client-streaming call in flight.
///
/// The call runs on its own task and pulls frames from a channel of capacity
/// one, so frames reach the backend in the order they were sent. Dropping the
/// value aborts the call.
pub struct ClientStreamingCall<M, R> {
    outbound: Option<mpsc::Sender<M>>,
    call: Option<Call<R>>,
}

impl<M, R> ClientStreamingCall<M, R>
where
    M: Send + 'static,
    R: Send + 'static,
{
    /// Starts the call. `invoke` receives the outbound frame stream and returns
    /// the tonic call future, e.g. `|frames| async move { client.upload(frames).await }`.
    pub fn start<F, Fut>(invoke: F) -> Self
    where
        F: FnOnce(Frames<M>) -> Fut,
        Fut: Future<Output = Result<Response<R>, Status>> + Send + 'static,
    {
        let (outbound, mut inbound) = mpsc::channel::<M>(1);
        let frames = async_stream::stream! {
            while let Some(frame) = inbound.recv().await {
                yield frame;
            }
        };
        let call = tokio::spawn(invoke(Box::pin(frames)));
        Self {
            outbound: Some(outbound),
            call: Some(call),
        }
    }

    pub async fn send(&mut self, frame: M) -> Result<(), Status> {
        let outbound = self
            .outbound
            .as_ref()
            .ok_or_else(|| Status::failed_precondition("stream already closed"))?;
        if outbound.send(frame).await.is_ok() {
            return Ok(());
        }

        // The call is over and stopped reading frames; surface its status.
        self.outbound = None;
        match self.finish().await {
            Err(status) => Err(status),
            Ok(_) => Err(Status::aborted(
                "stream closed by the server before all frames were sent",
            )),
        }
    }

    pub async fn close_and_receive(mut self) -> Result<R, Status> {
        self.outbound = None;
        self.finish().await
    }

    async fn finish(&mut self) -> Result<R, Status> {
        let call = self
            .call
            .take()
            .ok_or_else(|| Status::failed_precondition("stream already finished"))?;
        match call.await {
            Ok(reply) => reply.map(Response::into_inner),
            Err(e) => Err(Status::internal(format!("streaming call task failed: {}", e))),
        }
    }
}

impl<M, R> Drop for ClientStreamingCall<M, R> {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            call.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Arc;

    #[tokio::test]
    async fn frames_arrive_in_order_and_reply_is_returned() {
        let mut call = ClientStreamingCall::start(|frames: Frames<u32>| async move {
            let received: Vec<u32> = frames.collect().await;
            Ok(Response::new(received))
        });

        for frame in [3, 1, 2] {
            call.send(frame).await.unwrap();
        }

        assert_eq!(call.close_and_receive().await.unwrap(), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn early_server_error_is_reported_on_send() {
        let mut call = ClientStreamingCall::start(|mut frames: Frames<u32>| async move {
            let _first = frames.next().await;
            Err::<Response<()>, _>(Status::invalid_argument("bad frame"))
        });

        let mut outcome = Ok(());
        for frame in 0..10 {
            outcome = call.send(frame).await;
            if outcome.is_err() {
                break;
            }
        }

        let status = outcome.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn dropping_the_call_cancels_it() {
        let alive = Arc::new(());
        let held = alive.clone();
        let call = ClientStreamingCall::start(move |frames: Frames<u32>| async move {
            let _held = held;
            let _frames = frames;
            futures::future::pending::<()>().await;
            Ok(Response::new(()))
        });

        drop(call);
        for _ in 0..100 {
            if Arc::strong_count(&alive) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(Arc::strong_count(&alive), 1);
    }
}
