//! Keys of the system logs emitted by the bootloader and system contracts at the end of each batch,
//! together with the system contracts that are allowed to emit them.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::{Address, H160};

const fn system_contract_address(low: u16) -> Address {
    let mut bytes = [0_u8; 20];
    bytes[18] = (low >> 8) as u8;
    bytes[19] = low as u8;
    H160(bytes)
}

pub const BOOTLOADER_ADDRESS: Address = system_contract_address(0x8001);
pub const L2_TO_L1_MESSENGER_ADDRESS: Address = system_contract_address(0x8008);
pub const SYSTEM_CONTEXT_ADDRESS: Address = system_contract_address(0x800b);
pub const PUBDATA_CHUNK_PUBLISHER_ADDRESS: Address = system_contract_address(0x8011);

/// Key of a system log. The numeric value is the `key` word of the log record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    EnumIter,
    EnumCount,
    Display,
)]
#[repr(u8)]
pub enum SystemLogKey {
    L2ToL1LogsTreeRoot = 0,
    TotalL2ToL1Pubdata = 1,
    StateDiffHash = 2,
    PackedBatchAndL2BlockTimestamp = 3,
    PrevBatchHash = 4,
    ChainedPriorityTxnHash = 5,
    NumberOfLayer1Txs = 6,
    BlobOneHash = 7,
    BlobTwoHash = 8,
    ExpectedSystemContractUpgradeTxHash = 9,
}

impl SystemLogKey {
    /// The only system contract allowed to emit a log with this key.
    pub fn authorized_sender(self) -> Address {
        match self {
            Self::L2ToL1LogsTreeRoot | Self::TotalL2ToL1Pubdata | Self::StateDiffHash => {
                L2_TO_L1_MESSENGER_ADDRESS
            }
            Self::PackedBatchAndL2BlockTimestamp | Self::PrevBatchHash => SYSTEM_CONTEXT_ADDRESS,
            Self::ChainedPriorityTxnHash
            | Self::NumberOfLayer1Txs
            | Self::ExpectedSystemContractUpgradeTxHash => BOOTLOADER_ADDRESS,
            Self::BlobOneHash | Self::BlobTwoHash => PUBDATA_CHUNK_PUBLISHER_ADDRESS,
        }
    }

    /// Bit of this key in the processed logs bitmap.
    pub fn bit(self) -> u16 {
        1 << (self as u8)
    }
}
