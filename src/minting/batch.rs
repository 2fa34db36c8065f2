//! Mint batch construction.

use alloy::primitives::Address;

use crate::imx::types::{ether_key, MintRequest, MintToken, MintUser};
use crate::minting::service::MintError;

/// Reject counts at or above the configured maximum.
pub fn check_count(requested: u64, max: u64) -> Result<(), MintError> {
    if requested >= max {
        return Err(MintError::TooManyTokens { requested, max });
    }
    Ok(())
}

/// `count` tokens with consecutive ids starting at `base_id`.
pub fn build_tokens(
    base_id: u64,
    count: u64,
    blueprint: &str,
) -> Result<Vec<MintToken>, MintError> {
    (0..count)
        .map(|offset| {
            let id = base_id
                .checked_add(offset)
                .ok_or(MintError::TokenIdOverflow { base_id, count })?;
            Ok(MintToken {
                id: id.to_string(),
                blueprint: blueprint.to_string(),
            })
        })
        .collect()
}

/// Single-recipient mint request for `contract_address`.
pub fn build_mint_request(
    contract_address: &str,
    recipient: Address,
    tokens: Vec<MintToken>,
) -> MintRequest {
    MintRequest {
        contract_address: contract_address.to_string(),
        users: vec![MintUser {
            ether_key: ether_key(recipient),
            tokens,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_boundary() {
        assert!(check_count(4, 5).is_ok());
        assert!(check_count(0, 5).is_ok());
        assert!(matches!(
            check_count(5, 5),
            Err(MintError::TooManyTokens { requested: 5, max: 5 })
        ));
        assert!(check_count(6, 5).is_err());
    }

    #[test]
    fn test_consecutive_ids() {
        let tokens = build_tokens(100, 2, "onchain-metadata").unwrap();
        assert_eq!(
            tokens,
            vec![
                MintToken { id: "100".to_string(), blueprint: "onchain-metadata".to_string() },
                MintToken { id: "101".to_string(), blueprint: "onchain-metadata".to_string() },
            ]
        );
    }

    #[test]
    fn test_counts_match() {
        for count in [0u64, 1, 7, 49] {
            let tokens = build_tokens(10, count, "bp").unwrap();
            assert_eq!(tokens.len() as u64, count);
            for (offset, token) in tokens.iter().enumerate() {
                assert_eq!(token.id, (10 + offset as u64).to_string());
            }
        }
    }

    #[test]
    fn test_id_overflow() {
        let err = build_tokens(u64::MAX, 2, "bp").unwrap_err();
        assert!(matches!(err, MintError::TokenIdOverflow { .. }));
    }

    #[test]
    fn test_request_targets_recipient() {
        let recipient: Address = "0x84daa703e1cbad82416a1122c7c4e213b64eba44".parse().unwrap();
        let tokens = build_tokens(1, 1, "bp").unwrap();
        let request = build_mint_request("0xtoken", recipient, tokens);

        assert_eq!(request.contract_address, "0xtoken");
        assert_eq!(request.users.len(), 1);
        assert_eq!(request.users[0].ether_key, "0x84daa703e1cbad82416a1122c7c4e213b64eba44");
    }
}
