use bridge_types::{DomainId, Message, Payload, ResourceId};

use crate::DecodeError;

/// Turns one `Deposit` event's raw calldata into a [`Message`]. Registered
/// per handler-contract address in a [`crate::SourceHandlerRegistry`].
pub trait DepositDecoder: Send + Sync {
    fn decode(
        &self,
        source: DomainId,
        destination: DomainId,
        deposit_nonce: u64,
        resource_id: ResourceId,
        calldata: &[u8],
    ) -> Result<Message, DecodeError>;
}

/// Decodes the standard fungible-transfer calldata layout:
/// `[0..32) amount ‖ [32..64) recipient-length ‖ [64..) recipient`.
///
/// The declared recipient-length is checked against the actual tail length
/// rather than used to re-slice it, so a deposit whose length field disagrees
/// with what was actually appended is rejected instead of silently truncated
/// or padded.
#[derive(Debug, Default)]
pub struct Erc20Decoder;

impl DepositDecoder for Erc20Decoder {
    fn decode(
        &self,
        source: DomainId,
        destination: DomainId,
        deposit_nonce: u64,
        resource_id: ResourceId,
        calldata: &[u8],
    ) -> Result<Message, DecodeError> {
        if calldata.len() < 84 {
            return Err(DecodeError::MalformedPayload(format!(
                "calldata length {} is below the minimum of 84 bytes",
                calldata.len()
            )));
        }
        let amount: [u8; 32] = calldata[0..32]
            .try_into()
            .expect("slice of length 32 always converts");
        let declared_len = u64_from_be_tail(&calldata[32..64]) as usize;
        let tail = &calldata[64..];
        if declared_len != tail.len() {
            return Err(DecodeError::MalformedPayload(format!(
                "declared recipient length {declared_len} does not match actual tail length {}",
                tail.len()
            )));
        }

        Ok(Message::new(
            source,
            destination,
            deposit_nonce,
            resource_id,
            Payload::Fungible {
                amount,
                recipient: tail.to_vec(),
            },
        ))
    }
}

/// A left-padded 32-byte big-endian integer rarely needs more than its low
/// bytes; reading the last 8 is enough for any realistic recipient length.
fn u64_from_be_tail(word: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let len = word.len().min(8);
    buf[8 - len..].copy_from_slice(&word[word.len() - len..]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::DomainId;

    fn resource_id() -> ResourceId {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        ResourceId::new(bytes)
    }

    #[test]
    fn decodes_well_formed_fungible_calldata() {
        let recipient = [0xCCu8; 20];
        let mut calldata = left_pad(100u64.to_be_bytes().to_vec());
        calldata.extend(left_pad(20u64.to_be_bytes().to_vec()));
        calldata.extend_from_slice(&recipient);

        let msg = Erc20Decoder
            .decode(DomainId::new(1), DomainId::new(2), 7, resource_id(), &calldata)
            .unwrap();
        assert_eq!(msg.deposit_nonce, 7);
        match msg.payload {
            Payload::Fungible { recipient: r, .. } => assert_eq!(r, recipient),
            other => panic!("expected fungible payload, got {other:?}"),
        }
    }

    #[test]
    fn rejects_calldata_shorter_than_84_bytes() {
        let calldata = vec![0u8; 80];
        let err = Erc20Decoder
            .decode(DomainId::new(1), DomainId::new(2), 1, resource_id(), &calldata)
            .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn exactly_84_bytes_with_correct_declared_length_succeeds() {
        let recipient = [0xABu8; 20];
        let mut calldata = left_pad(1u64.to_be_bytes().to_vec());
        calldata.extend(left_pad(20u64.to_be_bytes().to_vec()));
        calldata.extend_from_slice(&recipient);
        assert_eq!(calldata.len(), 84);

        let msg = Erc20Decoder
            .decode(DomainId::new(1), DomainId::new(2), 1, resource_id(), &calldata)
            .unwrap();
        match msg.payload {
            Payload::Fungible { recipient: r, .. } => assert_eq!(r, recipient),
            other => panic!("expected fungible payload, got {other:?}"),
        }
    }

    #[test]
    fn exactly_84_bytes_with_mismatched_declared_length_is_malformed() {
        let tail = [0u8; 20];
        let mut calldata = left_pad(1u64.to_be_bytes().to_vec());
        calldata.extend(left_pad(0u64.to_be_bytes().to_vec()));
        calldata.extend_from_slice(&tail);
        assert_eq!(calldata.len(), 84);

        let err = Erc20Decoder
            .decode(DomainId::new(1), DomainId::new(2), 1, resource_id(), &calldata)
            .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    fn left_pad(bytes: Vec<u8>) -> Vec<u8> {
        crate::left_pad32(&bytes)
    }
}
