//! `eddy search`

use eddy_rig::RecommendationPipeline;

pub async fn run(pipeline: &RecommendationPipeline, query: &str, top_k: usize) -> anyhow::Result<()> {
    let chunks = pipeline.search_documents(query, top_k).await?;
    if chunks.is_empty() {
        println!("No matching passages.");
        return Ok(());
    }

    for (i, chunk) in chunks.iter().enumerate() {
        println!("[{}] {} (relevance {:.3})", i + 1, chunk.reference(), chunk.score);
        println!("{}\n", chunk.text.trim());
    }
    Ok(())
}
