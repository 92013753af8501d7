//! Features exposed to the rendering layer

pub mod translator;
