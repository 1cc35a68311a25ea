//! Audio subsystem
//!
//! PCM decoding, WAV encoding, output sinks, and the per-clip playback
//! transport.

pub mod pcm;
pub mod sink;
pub mod transport;
pub mod types;
pub mod wav;

pub use pcm::decode_pcm16;
pub use sink::{AudioSink, BufferSource, OutputDevice, RodioSink};
pub use transport::{ClipTransport, Transport};
pub use types::{SampleBuffer, TransportState};
pub use wav::{encode_wav, write_wav, WAV_HEADER_LEN};
