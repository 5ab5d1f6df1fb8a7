#![macro_use]
#![allow(unused)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("You may not enable both `defmt` and `log` features.");

// Host unit tests run without a defmt global logger, so defmt output is
// compiled out under `cfg(test)`.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::trace!($s $(, $x)*);
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(any(feature = "log", all(feature = "defmt", not(test)))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::debug!($s $(, $x)*);
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(any(feature = "log", all(feature = "defmt", not(test)))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::info!($s $(, $x)*);
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(any(feature = "log", all(feature = "defmt", not(test)))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::warn!($s $(, $x)*);
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(any(feature = "log", all(feature = "defmt", not(test)))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::error!($s $(, $x)*);
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::error!($s $(, $x)*);
            #[cfg(not(any(feature = "log", all(feature = "defmt", not(test)))))]
            let _ = ($( & $x ),*);
        }
    };
}
