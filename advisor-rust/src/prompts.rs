//! Prompt templates, one per request kind. Every function here is pure: the
//! same context always renders the same text.

use crate::{
    context::{AlertsContext, ChatContext, PriceTrendContext, SchemesContext, WeatherContext},
    instruction::{get_prompt, InstructionParam},
    ActivityRecord, ConversationRole, FarmerProfile,
};
use chrono::Days;
use krishi_genai::{Content, Part, Role};

const NO_ACTIVITIES: &str = "No recent activities logged.";

const CHAT_PREAMBLE: &str = "You are \"Krishi Mitra AI\", an expert agricultural assistant for Indian farmers. Your goal is to provide **holistic and integrated advice** by synthesizing all available data points: the farmer's profile, their logged activities, weather forecasts, market price trends, and available government schemes.
Your user is a farmer in India. Communicate clearly and concisely. If the user writes in a regional Indian language such as Kannada, Hindi, Telugu, Tamil or Marathi, you MUST respond in that same language.";

const CHAT_CORE_TASKS: &str = "**Your Core Tasks:**
1.  **Synthesized Advisory:** Do not give siloed information. Combine the data you have into one actionable recommendation. For example, if pest risk is high and rain is expected, advise delaying spraying until a dry window and say when that window is.
2.  **Answer Questions:** Answer farming questions using all the context you have.
3.  **Activity Logging:** When the user mentions an activity, acknowledge it and confirm it was noted.
4.  **Disease Detection:** If an image of a plant is attached, analyze it for diseases or pests. Give a diagnosis and suggest both organic and chemical treatments.
5.  **Market & Scheme Info:** If asked about prices or schemes, give concise, relevant information.
6.  **Contextual Reminders:** Base reminders on the logged activities. If irrigation has not been logged for a while and the weather is dry, gently remind them.

Make every recommendation time-sensitive and actionable: say what to do and when.
Be a supportive, proactive, and empowering partner to the farmer.";

const CHAT_INSTRUCTIONS: [InstructionParam<ChatContext>; 4] = [
    InstructionParam::String(CHAT_PREAMBLE),
    InstructionParam::Func(chat_profile_section),
    InstructionParam::Func(chat_activity_section),
    InstructionParam::String(CHAT_CORE_TASKS),
];

/// The system instruction for a chat turn: profile, last activities and the
/// behavioural charter.
#[must_use]
pub fn chat_system_instruction(context: &ChatContext) -> String {
    get_prompt(&CHAT_INSTRUCTIONS, context)
}

fn chat_profile_section(context: &ChatContext) -> String {
    let profile = &context.profile;
    format!(
        "**Farmer's Profile:**
- Name: {}
- Location: {}
- Land Size: {} acres
- Main Crop: {}
- Soil Type: {}
- Irrigation Method: {}",
        profile.name,
        profile.location,
        profile.land_size,
        profile.main_crop,
        profile.soil_type,
        profile.irrigation_method
    )
}

fn chat_activity_section(context: &ChatContext) -> String {
    format!(
        "**Recent Farmer Activities (last 5):**\n{}",
        activity_summary(&context.recent_activities)
    )
}

/// One line per activity, or a placeholder when nothing is logged.
#[must_use]
pub fn activity_summary(activities: &[ActivityRecord]) -> String {
    if activities.is_empty() {
        return NO_ACTIVITIES.to_string();
    }
    activities
        .iter()
        .map(|log| {
            format!(
                "- On {}, action: {}, notes: {}",
                log.date.format("%Y-%m-%d"),
                log.activity_type,
                log.notes
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Conversation turns for a chat request: prior turns as text, then the new
/// utterance with the attached image (if any) placed before the text.
#[must_use]
pub fn chat_contents(context: &ChatContext) -> Vec<Content> {
    let mut contents: Vec<Content> = context
        .history
        .iter()
        .map(|turn| Content {
            role: match turn.role {
                ConversationRole::Model => Role::Model,
                ConversationRole::User | ConversationRole::System => Role::User,
            },
            parts: vec![Part::text(turn.content.clone())],
        })
        .collect();

    let mut parts = Vec::with_capacity(2);
    if let Some(image) = &context.image {
        parts.push(Part::InlineData(image.clone()));
    }
    parts.push(Part::text(context.utterance.clone()));
    contents.push(Content::user(parts));

    contents
}

#[must_use]
pub fn weather_prompt(context: &WeatherContext) -> String {
    format!("Get the 5-day weather forecast for {}.", context.location)
}

#[must_use]
pub fn price_trend_prompt(context: &PriceTrendContext) -> String {
    let today = context.today;
    let window_start = today - Days::new(30);
    let horizon_start = today + Days::new(1);
    let horizon_end = today + Days::new(7);

    format!(
        "Analyze the market price for \"{crop}\" in the region of \"{location}, India\".
Provide a realistic but simulated price trend analysis.
- Generate historical data for the last 30 days, from {window_start} to {today}.
- Generate a price prediction for the next 7 days, from {horizon_start} to {horizon_end}.
- The price should be in INR per quintal.
- Write a brief, one-paragraph summary of the trend and your prediction.",
        crop = context.crop,
        location = context.location,
    )
}

#[must_use]
pub fn schemes_prompt(context: &SchemesContext) -> String {
    let profile = &context.profile;
    format!(
        "Based on the following farmer's profile, generate a list of 2-3 relevant (but simulated) Indian government agricultural schemes.
{}

Provide key details for each scheme: a brief description, general eligibility criteria, an upcoming application deadline (within the next 30-90 days), and a placeholder application link.",
        farm_lines(profile)
    )
}

#[must_use]
pub fn alerts_prompt(context: &AlertsContext) -> String {
    let profile = &context.profile;
    format!(
        "You are an AI agricultural expert. Your task is to generate 3-4 smart, proactive alerts for a farmer based on their profile, recent activities, and simulated real-time data (weather, pests, market).

**Farmer Profile:**
{farm}
- Soil Type: {soil}

**Recent Activities:**
{activities}

**Instructions:**
1.  Analyze all the provided context.
2.  Generate alerts that are timely, relevant, and actionable.
3.  Cover pest risk, weather risk and market risk (e.g., pest outbreak due to humidity, need for irrigation given no recent irrigation and dry weather, market price fluctuations).
4.  Assign a priority ('High', 'Medium', 'Low') to each alert.
5.  Give each alert a unique id, a clear title, a concise message and the current timestamp in ISO format.

**Example alert:**
- Title: \"Pest Alert: Aphids\"
- Message: \"High humidity and warm temperatures in your area increase the risk of an aphid outbreak on your {crop} crop. Inspect the underside of leaves in the next 1-2 days.\"
- Priority: \"High\"",
        farm = farm_lines(profile),
        soil = profile.soil_type,
        activities = activity_summary(&context.recent_activities),
        crop = profile.main_crop,
    )
}

fn farm_lines(profile: &FarmerProfile) -> String {
    format!(
        "- Location: {}\n- Main Crop: {}\n- Land Size: {} acres\n- Irrigation: {}",
        profile.location, profile.main_crop, profile.land_size, profile.irrigation_method
    )
}
