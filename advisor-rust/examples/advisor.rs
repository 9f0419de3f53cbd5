use dotenvy::dotenv;
use krishi_advisor::{
    rank_alerts, ActivityRecord, ActivityType, AdvisoryError, FarmerProfile, JsonFileStore,
    KeyValueActivityStore, Mediator, ModelConfig,
};
use krishi_advisor::{invoker::GoogleConnector, store::ActivityStore};
use std::{error::Error, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let profile = FarmerProfile {
        name: "Ramesh Gowda".to_string(),
        location: "Mandya, Karnataka".to_string(),
        land_size: 2.5,
        main_crop: "Sugarcane".to_string(),
        soil_type: "Red Loam".to_string(),
        irrigation_method: "Drip".to_string(),
    };
    profile.validate()?;

    let store = Arc::new(KeyValueActivityStore::new(JsonFileStore::new(
        "krishi-activity.json",
    )));
    store
        .append(ActivityRecord::log(
            chrono::Local::now().date_naive(),
            ActivityType::Irrigation,
            "Drip irrigation for 2 hours",
        )?)
        .await?;
    let activities = store.load_activities().await?;

    let mediator = Mediator::builder(GoogleConnector::default())
        .models(ModelConfig::from_env())
        .activity_store(store)
        .build();

    match mediator
        .converse(&profile, &[], "ನಾಳೆ ನೀರಾವರಿ ಮಾಡಬೇಕೇ?", None)
        .await
    {
        Ok(answer) => println!("{answer}\n"),
        Err(AdvisoryError::Unavailable) => {
            println!("Set GOOGLE_API_KEY to talk to the AI service.");
            return Ok(());
        }
        Err(err) => println!("chat: {err}\n"),
    }

    match mediator.weather_forecast(&profile.location).await {
        Ok(weather) => {
            for day in &weather.forecast {
                println!(
                    "{:<10} {:>5.1}/{:>5.1} C  {:<8} {:>3.0}% rain",
                    day.day, day.temp_high, day.temp_low, day.condition, day.precipitation_chance
                );
            }
        }
        Err(err) => println!("weather: {err}"),
    }

    match mediator.price_trend(&profile.main_crop, &profile.location).await {
        Ok(trend) => println!(
            "\n{} in {}: latest {:?}, change {:?}\n{}",
            trend.crop,
            trend.location,
            trend.latest_price(),
            trend.predicted_change(),
            trend.summary
        ),
        Err(err) => println!("price trend: {err}"),
    }

    match mediator.scheme_reminders(&profile).await {
        Ok(schemes) => {
            for scheme in schemes {
                println!("\n{} (apply by {})", scheme.scheme_name, scheme.deadline);
            }
        }
        Err(err) => println!("schemes: {err}"),
    }

    match mediator.smart_alerts(&profile, &activities).await {
        Ok(alerts) => {
            for alert in rank_alerts(alerts, 3) {
                println!("\n[{}] {}: {}", alert.priority.label(), alert.title, alert.message);
            }
        }
        Err(err) => println!("alerts: {err}"),
    }

    Ok(())
}
