pub mod automation;
pub mod component;
pub mod effect;
pub mod instrument;
pub mod note;
pub mod pattern;
pub mod sample;
pub mod sequence;
pub mod song;
pub mod timeline;

pub use automation::*;
pub use component::*;
pub use effect::*;
pub use instrument::*;
pub use note::*;
pub use pattern::*;
pub use sample::*;
pub use sequence::*;
pub use song::*;
pub use timeline::*;
