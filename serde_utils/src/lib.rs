pub mod alternate_display;
pub mod prefixed_hex_or_bytes_array;
pub mod string_or_native;
pub mod string_or_native_sequence;

mod shared;
