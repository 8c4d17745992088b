// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;
