/// Discriminates the shape of a [`crate::Message`]'s payload.
///
/// Mirrors the three transfer kinds a bridge resource can be registered as;
/// kept as a plain enum of field-carrying variants rather than an erased
/// `Vec<Box<dyn Any>>`, so a mis-typed payload is a compile error for any
/// handler that pattern-matches on it, not a runtime cast failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Fungible {
        /// Big-endian 256-bit amount, kept as opaque bytes (never parsed into
        /// a numeric type by the core — the destination handler ABI-encodes
        /// it verbatim).
        amount: [u8; 32],
        recipient: Vec<u8>,
    },
    NonFungible {
        token_id: Vec<u8>,
        recipient: Vec<u8>,
        metadata: Vec<u8>,
    },
    Generic(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    FungibleTransfer,
    NonFungibleTransfer,
    GenericTransfer,
}

impl Payload {
    pub fn kind(&self) -> TransferType {
        match self {
            Payload::Fungible { .. } => TransferType::FungibleTransfer,
            Payload::NonFungible { .. } => TransferType::NonFungibleTransfer,
            Payload::Generic(_) => TransferType::GenericTransfer,
        }
    }
}

impl std::fmt::Display for TransferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransferType::FungibleTransfer => "FungibleTransfer",
            TransferType::NonFungibleTransfer => "NonFungibleTransfer",
            TransferType::GenericTransfer => "GenericTransfer",
        };
        f.write_str(s)
    }
}
