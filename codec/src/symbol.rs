//! Enumerated and bit-flag fields.
//!
//! [`symbols!`](crate::symbols) declares a closed set of named wire codes. Codes outside the
//! set decode to an `Unknown(raw)` variant and re-encode to the same raw value: newer dialects
//! add codes this crate may not know yet, and rejecting them would abort decoding of the whole
//! message.
//!
//! [`flags!`](crate::flags) declares a set of independently combinable named bits on top of
//! [`bitflags`]. Unknown bits are retained, so decoding and re-encoding a message that uses
//! flags newer than this crate is lossless.

/// Declares an enumerated field over a little-endian integer.
///
/// ```
/// use smbwire_codec::{symbols, DecodeExt, Encode};
///
/// symbols! {
///     /// Share type.
///     pub enum ShareType: u8 {
///         Disk = 0x01,
///         Pipe = 0x02,
///     }
/// }
///
/// assert_eq!(ShareType::from_code(0x02), ShareType::Pipe);
/// let unknown = ShareType::decode(&[0x7f][..]).unwrap();
/// assert_eq!(unknown, ShareType::Unknown(0x7f));
/// assert_eq!(&unknown.encode()[..], &[0x7f]);
/// ```
#[macro_export]
macro_rules! symbols {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A code with no symbol in this table, kept verbatim.
            Unknown($repr),
        }

        impl $name {
            /// Maps a wire code to its symbol, or to `Unknown` if it has none.
            pub const fn from_code(code: $repr) -> Self {
                match code {
                    $( $value => Self::$variant, )+
                    _ => Self::Unknown(code),
                }
            }

            /// Returns the wire code.
            pub const fn code(&self) -> $repr {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Unknown(code) => *code,
                }
            }

            /// Returns true if the code has a symbol in this table.
            pub const fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }

            /// Returns the symbol name, if any.
            pub const fn name(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some(stringify!($variant)), )+
                    Self::Unknown(_) => None,
                }
            }
        }

        impl From<$repr> for $name {
            fn from(code: $repr) -> Self {
                Self::from_code(code)
            }
        }

        impl From<$name> for $repr {
            fn from(symbol: $name) -> Self {
                symbol.code()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}(0x{:x})", stringify!($name), self.code()),
                }
            }
        }

        impl $crate::Write for $name {
            #[inline]
            fn write(&self, buf: &mut impl $crate::bytes::BufMut) {
                $crate::Write::write(&self.code(), buf);
            }
        }

        impl $crate::Read for $name {
            type Cfg = ();

            #[inline]
            fn read_cfg(
                buf: &mut impl $crate::bytes::Buf,
                _: &(),
            ) -> Result<Self, $crate::Error> {
                let code = <$repr as $crate::ReadExt>::read(buf)?;
                Ok(Self::from_code(code))
            }
        }

        impl $crate::FixedSize for $name {
            const SIZE: usize = <$repr as $crate::FixedSize>::SIZE;
        }
    };
}

/// Declares a bit-flag field over a little-endian integer.
///
/// ```
/// use smbwire_codec::{flags, DecodeExt, Encode};
///
/// flags! {
///     /// Share access.
///     pub struct ShareAccess: u32 {
///         const READ = 0x01;
///         const WRITE = 0x02;
///     }
/// }
///
/// let access = ShareAccess::decode(&[0x03, 0x00, 0x00, 0x80][..]).unwrap();
/// assert!(access.contains(ShareAccess::READ | ShareAccess::WRITE));
/// assert_eq!(access.bits(), 0x8000_0003);
/// assert_eq!(&access.encode()[..], &[0x03, 0x00, 0x00, 0x80]);
/// ```
#[macro_export]
macro_rules! flags {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident: $repr:ty {
            $(
                $(#[$fmeta:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $crate::bitflags::bitflags! {
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            $vis struct $name: $repr {
                $(
                    $(#[$fmeta])*
                    const $flag = $value;
                )*
            }
        }

        impl $crate::Write for $name {
            #[inline]
            fn write(&self, buf: &mut impl $crate::bytes::BufMut) {
                $crate::Write::write(&self.bits(), buf);
            }
        }

        impl $crate::Read for $name {
            type Cfg = ();

            #[inline]
            fn read_cfg(
                buf: &mut impl $crate::bytes::Buf,
                _: &(),
            ) -> Result<Self, $crate::Error> {
                let bits = <$repr as $crate::ReadExt>::read(buf)?;
                Ok(Self::from_bits_retain(bits))
            }
        }

        impl $crate::FixedSize for $name {
            const SIZE: usize = <$repr as $crate::FixedSize>::SIZE;
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{DecodeExt, Encode, EncodeSize};

    symbols! {
        /// Dialect revision.
        enum Dialect: u16 {
            Smb202 = 0x0202,
            Smb311 = 0x0311,
        }
    }

    flags! {
        /// Capabilities.
        struct Capabilities: u32 {
            const DFS = 0x0000_0001;
            const LEASING = 0x0000_0002;
        }
    }

    #[test]
    fn test_known_symbol() {
        let encoded = Dialect::Smb311.encode();
        assert_eq!(&encoded[..], &[0x11, 0x03]);
        assert_eq!(Dialect::decode(encoded).unwrap(), Dialect::Smb311);
        assert_eq!(Dialect::Smb311.to_string(), "Smb311");
        assert_eq!(Dialect::Smb202.encode_size(), 2);
    }

    #[test]
    fn test_unknown_symbol_retained() {
        let decoded = Dialect::decode(&[0x00, 0x04][..]).unwrap();
        assert_eq!(decoded, Dialect::Unknown(0x0400));
        assert!(!decoded.is_known());
        assert_eq!(decoded.name(), None);
        assert_eq!(decoded.to_string(), "Dialect(0x400)");
        assert_eq!(&decoded.encode()[..], &[0x00, 0x04]);
    }

    #[test]
    fn test_unknown_bits_retained() {
        let decoded = Capabilities::decode(&[0x03, 0x01, 0x00, 0x00][..]).unwrap();
        assert!(decoded.contains(Capabilities::DFS | Capabilities::LEASING));
        assert_eq!(decoded.bits(), 0x0103);
        assert_eq!(&decoded.encode()[..], &[0x03, 0x01, 0x00, 0x00]);
    }
}
