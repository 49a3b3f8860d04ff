pub mod compositor;
pub mod convert;
pub mod encoder;
pub mod export;
pub mod model;
pub mod packet;
pub mod palette;
pub mod replay;
pub mod schedule;
pub mod transition;
pub mod vram;

pub mod prelude {
    pub use crate::compositor::Compositor;
    pub use crate::export::{ExportError, ExportOutput, Exporter};
    pub use crate::model::{BmpEvent, Clip, ClipKind, IndexedImage, TextEvent, TextStyle};
    pub use crate::packet::{PACKET_SIZE, PACKETS_PER_SECOND, Packet};
    pub use crate::palette::{DEFAULT_PALETTE, Palette, Rgb};
    pub use crate::replay::Replayer;
    pub use crate::transition::Transition;
    pub use crate::vram::Vram;
}
