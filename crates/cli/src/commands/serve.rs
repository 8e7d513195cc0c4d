//! `cekfakta serve`: Start the web chat.

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let checker = super::build_checker(&config)?;

    println!("🩺 Asisten Cek Fakta Medis");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model.model);

    cekfakta_gateway::start(&config, checker).await?;

    Ok(())
}
