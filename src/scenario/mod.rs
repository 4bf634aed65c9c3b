/// End-to-end deployment scenarios, generic over the chain client
pub mod nft_distribution;
