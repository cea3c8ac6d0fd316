//! `eddy status`

use eddy_rig::RecommendationPipeline;

pub async fn run(pipeline: &RecommendationPipeline) -> anyhow::Result<()> {
    let status = pipeline.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    if !status.is_ready() {
        anyhow::bail!("pipeline is not ready");
    }
    Ok(())
}
