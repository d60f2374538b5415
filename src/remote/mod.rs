pub mod loopback;
pub mod sink;

pub use loopback::{LoopbackSession, LoopbackSink};
pub use sink::{ConnectError, EditedStreamSender, RemoteSession, RemoteSink};
