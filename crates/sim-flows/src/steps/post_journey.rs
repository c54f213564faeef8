//! Post Journey: create-post → publish-to-homeserver → index-post →
//! app-discovery.

use std::fmt;
use std::sync::Arc;

use sim_core::{SimulationError, Step, StepError, StepSet};

use crate::clients::PostJourneyClient;
use crate::data::{Post, PostJourneyData, PublishResult};

pub const CREATE_POST: &str = "create-post";
pub const PUBLISH_TO_HOMESERVER: &str = "publish-to-homeserver";
pub const INDEX_POST: &str = "index-post";
pub const APP_DISCOVERY: &str = "app-discovery";

#[derive(Clone)]
pub struct PostJourneyConfig {
    pub post: Post,
    pub secret_key: Vec<u8>,
    pub homeserver: String,
    pub client: Arc<dyn PostJourneyClient>,
}

impl fmt::Debug for PostJourneyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostJourneyConfig")
         .field("post", &self.post)
         .field("homeserver", &self.homeserver)
         .finish_non_exhaustive()
    }
}

/// Construye los cuatro steps de Post Journey.
pub fn post_journey_steps(config: &PostJourneyConfig) -> Result<StepSet<PostJourneyData>, SimulationError> {
    let post = config.post.clone();
    let create = Step::new(CREATE_POST, "Create Post", move |_data: PostJourneyData| {
        let post = post.clone();
        async move {
            Ok::<_, StepError>(PostJourneyData { post: Some(post),
                                                 ..Default::default() })
        }
    });

    let client = Arc::clone(&config.client);
    let secret_key = config.secret_key.clone();
    let publish = Step::new(PUBLISH_TO_HOMESERVER, "Publish to Homeserver", move |data: PostJourneyData| {
        let client = Arc::clone(&client);
        let secret_key = secret_key.clone();
        async move { publish_post(client.as_ref(), &data, &secret_key).await }
    });

    let client = Arc::clone(&config.client);
    let index = Step::new(INDEX_POST, "Nexus Indexing", move |data: PostJourneyData| {
        let client = Arc::clone(&client);
        async move { index_post(client.as_ref(), &data).await }
    });

    let client = Arc::clone(&config.client);
    let discover = Step::new(APP_DISCOVERY, "App Discovery", move |data: PostJourneyData| {
        let client = Arc::clone(&client);
        async move { discover_post(client.as_ref(), &data).await }
    });

    StepSet::new(vec![create, publish, index, discover])
}

fn require_publish_result(data: &PostJourneyData) -> Result<&PublishResult, StepError> {
    data.publish_result.as_ref().ok_or_else(|| StepError::missing("Publish result"))
}

async fn publish_post(client: &dyn PostJourneyClient, data: &PostJourneyData, secret_key: &[u8]) -> Result<PostJourneyData, StepError> {
    let post = data.post.as_ref().ok_or_else(|| StepError::missing("Post"))?;
    let publish_result = client.publish_post(post, secret_key).await?;
    Ok(PostJourneyData { publish_result: Some(publish_result),
                         ..Default::default() })
}

async fn index_post(client: &dyn PostJourneyClient, data: &PostJourneyData) -> Result<PostJourneyData, StepError> {
    let uri = &require_publish_result(data)?.uri;
    let index_result = client.index_post(uri).await?;
    Ok(PostJourneyData { index_result: Some(index_result),
                         ..Default::default() })
}

async fn discover_post(client: &dyn PostJourneyClient, data: &PostJourneyData) -> Result<PostJourneyData, StepError> {
    let uri = &require_publish_result(data)?.uri;
    let discovery_result = client.discover_post(uri).await?;
    Ok(PostJourneyData { discovery_result: Some(discovery_result),
                         ..Default::default() })
}
