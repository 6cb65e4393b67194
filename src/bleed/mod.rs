//! Buffer helpers shared by the encoders.

mod writer;

pub(crate) use writer::Writer;
