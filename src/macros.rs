//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! decode_failed {
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::ConvertError::DecodeFailed(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! encode_failed {
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::ConvertError::EncodeFailed(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_policy {
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::ConvertError::InvalidPolicy(
            format!($fmt, $($arg)+)))
    };
}

//===========================================================================//
