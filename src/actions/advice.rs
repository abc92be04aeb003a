//! AI advice actions.

use super::Dashboard;
use crate::advice::{
    AdviceContext, CompletionProvider, CompletionRequest, FinancialAdvice, advice_prompt,
    advice_schema, parse_advice, question_prompt,
};
use crate::error::{Error, Result};
use crate::model::TransactionQuery;
use tracing::{debug, info, warn};

/// How many recent transactions the advice prompt includes.
pub const RECENT_TRANSACTIONS: u32 = 20;

const GENERATE_FAILED: &str = "Failed to generate advice";
const ANSWER_FAILED: &str = "Failed to get answer";

impl Dashboard<'_> {
    /// Build the advice prompt from the caller's data without calling a model.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn build_advice_prompt(&self) -> Result<String> {
        let user_id = self.require_user()?;

        // A missing profile renders the defaults rather than failing.
        let profile = self.storage.get_profile(&user_id)?;
        let budgets = self.storage.list_budgets(&user_id)?;
        let transactions = self
            .storage
            .list_transactions(&user_id, &TransactionQuery::latest(RECENT_TRANSACTIONS))?;
        let goals = self.storage.list_savings_goals(&user_id)?;

        Ok(advice_prompt(&AdviceContext {
            profile: profile.as_ref(),
            budgets: &budgets,
            transactions: &transactions,
            goals: &goals,
        }))
    }

    /// Ask the model for personalized recommendations and a health score.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `Persistence`, `Generation` ("Failed to generate
    /// advice") if the completion call fails, or `Parse` if the reply holds
    /// no valid advice object.
    pub async fn generate_financial_advice<P: CompletionProvider>(
        &self,
        provider: &P,
    ) -> Result<FinancialAdvice> {
        let prompt = self.build_advice_prompt()?;
        let request = CompletionRequest::structured(prompt, advice_schema());

        let info = provider.info();
        debug!(provider = %info.name, model = %info.model, "Requesting advice");

        let reply = provider.complete(&request).await.map_err(|e| {
            warn!(error = %e, "Advice generation failed");
            Error::Generation(GENERATE_FAILED.to_string())
        })?;

        let advice = parse_advice(&reply).inspect_err(|e| {
            warn!(error = ?e, "Advice reply could not be parsed");
        })?;
        info!(
            recommendations = advice.recommendations.len(),
            score = advice.financial_health_score,
            "Generated advice"
        );
        Ok(advice)
    }

    /// Answer a free-form question; the reply text is returned verbatim.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `Persistence`, or `Generation` ("Failed to get
    /// answer") if the completion call fails.
    pub async fn ask_question<P: CompletionProvider>(&self, provider: &P, question: &str) -> Result<String> {
        let user_id = self.require_user()?;
        let profile = self.storage.get_profile(&user_id)?;

        let request = CompletionRequest::text(question_prompt(profile.as_ref(), question));
        provider.complete(&request).await.map_err(|e| {
            warn!(error = %e, "Question answering failed");
            Error::Generation(ANSWER_FAILED.to_string())
        })
    }
}
