/// The data structure a `ServerSetup` is built over. `Raw` stores the
/// (keyed) set verbatim; `Gcs` ("garbled Cuckoo / compressed set") stores a
/// space-efficient probabilistic summary instead, trading exactness for
/// a smaller wire payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStructure {
    Raw,
    Gcs,
}

/// An opaque, self-describing message. Each of `Request`, `Response`, and
/// `ServerSetup` wraps exactly the bytes a `PsiServer` implementation wants
/// on the wire; this crate never inspects the payload, so swapping the
/// backend for a real PSI library only changes what lives inside `bytes`.
macro_rules! opaque_message {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub bytes: Vec<u8>,
        }

        impl $name {
            pub fn from_bytes(bytes: Vec<u8>) -> Self {
                $name { bytes }
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.bytes
            }

            pub fn into_bytes(self) -> Vec<u8> {
                self.bytes
            }
        }
    };
}

opaque_message!(Request);
opaque_message!(Response);
opaque_message!(ServerSetup);
