pub mod cw721;
pub mod nft_distribution;

pub use cw721::Cw721;
pub use nft_distribution::NftDistribution;
