pub const LENGTH_PREFIX_SIZE: usize = 2;

pub const MICROS_RANGE: std::ops::Range<usize> = 0..4;
pub const FILE_NAME_OFFSET: usize = 4;

pub const LINE_NUMBER_SIZE: usize = 2;
pub const SEVERITY_SIZE: usize = 1;
pub const NUM_ARGS_SIZE: usize = 1;
/// Bytes following the file name: line number, severity, argument count.
pub const HEADER_TAIL_SIZE: usize = LINE_NUMBER_SIZE + SEVERITY_SIZE + NUM_ARGS_SIZE;

pub const STRING_LENGTH_SIZE: usize = 1;
pub const MAX_STRING_LEN: usize = u8::MAX as usize;
pub const MAX_ARGS: usize = u8::MAX as usize;
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

pub const TAG_SIZE: usize = 1;
pub const TAG_UINT8: u8 = 1;
pub const TAG_UINT16: u8 = 2;
pub const TAG_UINT32: u8 = 3;
pub const TAG_STRING: u8 = 4;

pub const SEVERITY_FATAL: u8 = 1;
pub const SEVERITY_INFO: u8 = 2;
