use actix_web::HttpResponse;

use crate::auth::guard::AuthenticatedUser;

/// Nothing tracks opens or clicks yet: the figures are fixed.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterAnalytics {
    pub total_sent: u64,
    pub total_opens: u64,
    pub total_clicks: u64,
    pub open_rate: f64,
    pub click_rate: f64,
}

const MOCK_ANALYTICS: NewsletterAnalytics = NewsletterAnalytics {
    total_sent: 1250,
    total_opens: 306,
    total_clicks: 89,
    open_rate: 24.5,
    click_rate: 7.1,
};

#[tracing::instrument(name = "Dashboard analytics handler", skip(_authenticated))]
pub async fn handle_dashboard_analytics(_authenticated: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(MOCK_ANALYTICS)
}
