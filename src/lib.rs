pub mod collections;
pub mod stream;
pub mod stream_ext;
pub mod subject;

pub use stream::event::Event;
pub use stream_ext::RxExt;
pub use subject::Subject;

pub mod prelude {
    pub use crate::collections::*;
    pub use crate::stream::demand::*;
    pub use crate::stream::event::*;
    pub use crate::stream::just::*;
    pub use crate::stream::observable::*;
    pub use crate::stream::subscriber::*;
    pub use crate::stream::terminal::*;
    pub use crate::stream_ext::*;
    pub use crate::subject::replay_subject::*;
    pub use crate::subject::*;
}
