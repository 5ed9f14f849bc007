use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Client for the brand backend's REST API: campaigns, creator discovery and
/// outreach tracking. Plain request/response JSON; the streaming agent
/// endpoint lives on a separate service (`AgentClient`).
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignCreate {
    pub product_name: String,
    pub brand_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_use_cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_niche: Option<String>,
    pub total_budget: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub product_name: String,
    pub brand_name: String,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub key_use_cases: Option<String>,
    #[serde(default)]
    pub campaign_goal: Option<String>,
    #[serde(default)]
    pub product_niche: Option<String>,
    pub total_budget: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignListParams {
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct CreatorSearchParams {
    pub search: Option<String>,
    pub platform: Option<String>,
    pub niche: Option<String>,
    pub min_followers: Option<u64>,
    pub max_followers: Option<u64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub min_engagement: Option<f64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub email: String,
    pub platform: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    pub followers_count: String,
    pub followers_count_numeric: u64,
    pub engagement_rate: f64,
    pub country: String,
    pub niche: String,
    pub language: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub avg_views: Option<u64>,
    #[serde(default)]
    pub collaboration_rate: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub match_percentage: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatorSearchResponse {
    pub total: u64,
    pub creators: Vec<Creator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub summary: String,
    pub sentiment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachEntry {
    pub id: String,
    pub creator_id: String,
    pub campaign_id: String,
    pub status: String,
    pub last_contact: String,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// Full outreach record as returned by the per-campaign and per-id outreach
/// endpoints: the raw attempt plus whatever the call-analysis pipeline has
/// extracted so far. Analysis fields stay null until a call completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachRecord {
    pub id: String,
    pub campaign_id: String,
    pub creator_id: String,
    pub channel: String,
    pub message_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub twilio_call_sid: Option<String>,
    #[serde(default)]
    pub call_duration_seconds: Option<f64>,
    #[serde(default)]
    pub call_successful: Option<bool>,
    #[serde(default)]
    pub transcript_summary: Option<String>,
    #[serde(default)]
    pub full_transcript: Option<String>,
    #[serde(default)]
    pub interest_assessment_result: Option<String>,
    #[serde(default)]
    pub interest_assessment_rationale: Option<String>,
    #[serde(default)]
    pub communication_quality_result: Option<String>,
    #[serde(default)]
    pub communication_quality_rationale: Option<String>,
    #[serde(default)]
    pub interest_level: Option<String>,
    #[serde(default)]
    pub collaboration_rate: Option<String>,
    #[serde(default)]
    pub preferred_content_types: Option<Vec<String>>,
    #[serde(default)]
    pub timeline_availability: Option<String>,
    #[serde(default)]
    pub contact_preferences: Option<String>,
    #[serde(default)]
    pub audience_demographics: Option<serde_json::Value>,
    #[serde(default)]
    pub brand_restrictions: Option<Vec<String>>,
    #[serde(default)]
    pub follow_up_actions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    pub criteria_id: String,
    pub result: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub interest_assessment: EvaluationCriteria,
    pub communication_quality: EvaluationCriteria,
    pub information_gathering: EvaluationCriteria,
    pub next_steps: EvaluationCriteria,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCallData {
    pub interest_level: String,
    pub collaboration_rate: String,
    pub content_preferences: String,
    pub timeline: String,
    pub contact_info: String,
    pub follow_up_actions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time_in_call_secs: Option<f64>,
}

/// AI-derived analysis of one completed outreach call, keyed by the
/// conversation id recorded on the outreach entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallAnalysis {
    pub conversation_id: String,
    pub status: String,
    pub duration_seconds: f64,
    pub call_successful: String,
    pub summary: String,
    pub evaluation_results: EvaluationResults,
    pub extracted_data: ExtractedCallData,
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
}

#[derive(Debug, Serialize)]
struct InitiateCallRequest<'a> {
    outreach_id: &'a str,
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    outreach_id: &'a str,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            base_url,
        })
    }

    pub async fn create_campaign(&self, campaign: &CampaignCreate) -> Result<Campaign> {
        let url = self.base_url.join("/api/v1/campaigns/")?;
        let response = self
            .client
            .post(url)
            .json(campaign)
            .send()
            .await?
            .error_for_status()?;

        response.json().await.context("Failed to parse campaign")
    }

    pub async fn list_campaigns(&self, params: &CampaignListParams) -> Result<Vec<Campaign>> {
        let mut url = self.base_url.join("/api/v1/campaigns/")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = &params.status {
                query.append_pair("status", status);
            }
            if let Some(limit) = params.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(offset) = params.offset {
                query.append_pair("offset", &offset.to_string());
            }
        }

        let response = self.client.get(url).send().await?.error_for_status()?;

        response.json().await.context("Failed to parse campaigns")
    }

    pub async fn get_campaign(&self, campaign_id: &str) -> Result<Campaign> {
        let url = self
            .base_url
            .join(&format!("/api/v1/campaigns/{campaign_id}"))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response.json().await.context("Failed to parse campaign")
    }

    pub async fn search_creators(
        &self,
        params: &CreatorSearchParams,
    ) -> Result<CreatorSearchResponse> {
        let mut url = self.base_url.join("/api/v1/creators/")?;
        {
            let mut query = url.query_pairs_mut();
            // The backend filters creators by display name under `name`.
            if let Some(search) = &params.search {
                query.append_pair("name", search);
            }
            if let Some(platform) = &params.platform {
                query.append_pair("platform", platform);
            }
            if let Some(niche) = &params.niche {
                query.append_pair("niche", niche);
            }
            if let Some(min) = params.min_followers {
                query.append_pair("min_followers", &min.to_string());
            }
            if let Some(max) = params.max_followers {
                query.append_pair("max_followers", &max.to_string());
            }
            if let Some(country) = &params.country {
                query.append_pair("country", country);
            }
            if let Some(language) = &params.language {
                query.append_pair("language", language);
            }
            if let Some(min) = params.min_engagement {
                query.append_pair("min_engagement", &min.to_string());
            }
            if let Some(limit) = params.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(offset) = params.offset {
                query.append_pair("offset", &offset.to_string());
            }
        }

        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse creator search response")
    }

    pub async fn get_creator(&self, creator_id: &str) -> Result<Creator> {
        let url = self
            .base_url
            .join(&format!("/api/v1/creators/{creator_id}"))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response.json().await.context("Failed to parse creator")
    }

    pub async fn get_outreach(&self, outreach_id: &str) -> Result<OutreachRecord> {
        let url = self
            .base_url
            .join(&format!("/api/v1/outreach/{outreach_id}"))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse outreach record")
    }

    pub async fn list_campaign_outreach(&self, campaign_id: &str) -> Result<Vec<OutreachRecord>> {
        let url = self
            .base_url
            .join(&format!("/api/v1/outreach/campaign/{campaign_id}"))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse campaign outreach records")
    }

    pub async fn get_call_analysis(&self, conversation_id: &str) -> Result<CallAnalysis> {
        let url = self
            .base_url
            .join(&format!("/api/v1/outreach/call/{conversation_id}/analysis"))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse call analysis")
    }

    pub async fn list_outreach(&self) -> Result<Vec<OutreachEntry>> {
        let url = self.base_url.join("/api/v1/outreach/")?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse outreach entries")
    }

    pub async fn initiate_call(
        &self,
        outreach_id: &str,
        phone_number: &str,
    ) -> Result<serde_json::Value> {
        let url = self.base_url.join("/api/v1/outreach/call/initiate")?;
        let response = self
            .client
            .post(url)
            .json(&InitiateCallRequest {
                outreach_id,
                phone_number,
            })
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse call initiation response")
    }

    pub async fn send_email(&self, outreach_id: &str) -> Result<serde_json::Value> {
        let url = self.base_url.join("/api/v1/outreach/email/send")?;
        let response = self
            .client
            .post(url)
            .json(&SendEmailRequest { outreach_id })
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse email send response")
    }
}
