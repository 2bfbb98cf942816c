//! Conversions between [`ethabi::Token`]s and domain types.

use ethabi::Token;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("invalid output type: {0}")]
    InvalidOutputType(String),
}

/// Type that can be converted to and from a single ABI token.
pub trait Tokenizable: Sized {
    fn from_token(token: Token) -> Result<Self, ContractError>;

    fn into_token(self) -> Token;
}

/// Splits a tuple token into exactly `N` components.
pub(crate) fn into_tuple<const N: usize>(token: Token) -> anyhow::Result<[Token; N]> {
    let Token::Tuple(components) = token else {
        anyhow::bail!("not a tuple");
    };
    let len = components.len();
    components
        .try_into()
        .map_err(|_| anyhow::anyhow!("bad tuple length: expected {N}, got {len}"))
}
