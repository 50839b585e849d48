//! Basic usage example
//!
//! This example demonstrates the full cache lifecycle: resolve a request,
//! miss, commit the generated artifact, then watch an exact repeat and a
//! paraphrase both resolve to the cached asset.
//!
//! Usage:
//!   cargo run --example basic_usage

use anyhow::Result;
use gencache_rust::{AssetType, CacheArbiter, CacheOutcome, CommitOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let arbiter = CacheArbiter::builder().build()?;

    // First request: the cache is cold, so this misses.
    let prompt = "calm ocean waves, soft piano";
    let outcome = arbiter.resolve(prompt, 120, AssetType::Music).await?;
    let fingerprint = match outcome {
        CacheOutcome::Miss(fingerprint) => {
            println!("miss: key {}", &fingerprint.canonical_key[..16]);
            fingerprint
        }
        CacheOutcome::Hit(record) => {
            println!("unexpected hit: {}", record.location_ref);
            return Ok(());
        }
    };

    // Run your generation pipeline here; we pretend it produced this file.
    let location = "s3://media/ocean-waves-120s.wav";
    match arbiter
        .commit(fingerprint, 120, AssetType::Music, location)
        .await?
    {
        CommitOutcome::Created(record) => {
            println!("committed: {} -> {}", record.id, record.location_ref)
        }
        CommitOutcome::AlreadyCached(record) => {
            println!("someone beat us to it: {}", record.location_ref)
        }
    }

    // A byte-identical repeat resolves by exact canonical key.
    if let CacheOutcome::Hit(record) = arbiter.resolve(prompt, 120, AssetType::Music).await? {
        println!("exact hit: {} (usage {})", record.location_ref, record.usage());
    }

    // A paraphrase two seconds shorter resolves by embedding similarity.
    let paraphrase = "Calm ocean waves with soft piano";
    match arbiter.resolve(paraphrase, 118, AssetType::Music).await? {
        CacheOutcome::Hit(record) => {
            println!("similarity hit: {} (usage {})", record.location_ref, record.usage())
        }
        CacheOutcome::Miss(_) => println!("paraphrase missed"),
    }

    // The same prompt half as long is a different asset; no match.
    if arbiter.resolve(prompt, 60, AssetType::Music).await?.is_miss() {
        println!("60s variant misses: duration tolerance is 5s");
    }

    let stats = arbiter.stats();
    println!(
        "\nstats: {} exact, {} similarity, {} misses, hit ratio {:.2}",
        stats.exact_hits,
        stats.similarity_hits,
        stats.misses,
        stats.hit_ratio()
    );

    Ok(())
}
