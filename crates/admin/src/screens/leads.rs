//! Lead screens: corporate-cleaning enquiries and phone call-backs.

use booking_console_core::{ContactId, PhoneLeadId, PhoneLeadStatus, ServiceLine};
use tracing::{info, instrument};

use super::{ScreenCell, interpret};
use crate::api::{ContactLead, PhoneLead, envelope};
use crate::error::ScreenError;
use crate::state::AppState;

// =============================================================================
// Contacts
// =============================================================================

/// Corporate-cleaning enquiries from the contact form.
#[derive(Debug)]
pub struct ContactScreen {
    state: AppState,
    cell: ScreenCell<Vec<ContactLead>>,
}

impl ContactScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch().await;
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;
        let response = self.state.api().list_contacts(Some(&credential)).await?;
        let body = interpret(response, "Kunde inte hämta förfrågningar.").await?;
        let contacts = envelope::contacts(&body);
        self.cell.apply(|view| *view = contacts);
        Ok(())
    }

    /// Enquiries matching `query`; all of them for a blank query.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<ContactLead> {
        let query = query.trim();
        self.cell.read(|contacts| {
            contacts
                .iter()
                .filter(|c| query.is_empty() || c.matches(query))
                .cloned()
                .collect()
        })
    }

    /// # Errors
    ///
    /// Returns `Busy` while the same enquiry is being deleted, or the
    /// API/transport error; the list is unchanged on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ContactId) -> Result<(), ScreenError> {
        let result = self.remove(id).await;
        self.cell.settle(result)
    }

    async fn remove(&self, id: &ContactId) -> Result<(), ScreenError> {
        let _busy = self.cell.begin(id.as_str())?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .delete_contact(Some(&credential), id)
            .await?;
        interpret(response, "Kunde inte radera förfrågan.").await?;
        self.cell.apply(|view| view.retain(|c| &c.id != id));
        info!("Contact deleted");
        Ok(())
    }

    #[must_use]
    pub fn contacts(&self) -> Vec<ContactLead> {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}

// =============================================================================
// Phone leads
// =============================================================================

/// Which phone leads to show. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneLeadFilter {
    pub service: Option<ServiceLine>,
    pub status: Option<PhoneLeadStatus>,
}

impl PhoneLeadFilter {
    /// Leads carry the service's display label, e.g. `Flyttstädning`.
    #[must_use]
    pub fn matches(&self, lead: &PhoneLead) -> bool {
        self.service.is_none_or(|s| lead.service == s.label())
            && self.status.is_none_or(|s| lead.status == s)
    }
}

/// Call-me-back requests.
#[derive(Debug)]
pub struct PhoneLeadScreen {
    state: AppState,
    cell: ScreenCell<Vec<PhoneLead>>,
}

impl PhoneLeadScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch().await;
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;
        let response = self.state.api().list_phone_leads(Some(&credential)).await?;
        let body = interpret(response, "Kunde inte hämta telefonnummer.").await?;
        let leads = envelope::phone_leads(&body);
        self.cell.apply(|view| *view = leads);
        Ok(())
    }

    #[must_use]
    pub fn filtered(&self, filter: PhoneLeadFilter) -> Vec<PhoneLead> {
        self.cell.read(|leads| {
            leads
                .iter()
                .filter(|lead| filter.matches(lead))
                .cloned()
                .collect()
        })
    }

    /// # Errors
    ///
    /// Returns `Busy` while the same lead is being changed, or the
    /// API/transport error; the lead keeps its old status on failure.
    #[instrument(skip(self), fields(id = %id, status = %status))]
    pub async fn set_status(&self, id: &PhoneLeadId, status: PhoneLeadStatus) -> Result<(), ScreenError> {
        let result = self.update_status(id, status).await;
        self.cell.settle(result)
    }

    async fn update_status(&self, id: &PhoneLeadId, status: PhoneLeadStatus) -> Result<(), ScreenError> {
        let _busy = self.cell.begin(id.as_str())?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .update_phone_lead_status(Some(&credential), id, status)
            .await?;
        interpret(response, "Kunde inte uppdatera status.").await?;
        self.cell.apply(|leads| {
            if let Some(lead) = leads.iter_mut().find(|lead| &lead.id == id) {
                lead.status = status;
            }
        });
        info!("Phone lead status updated");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Busy` while the same lead is being changed, or the
    /// API/transport error; the list is unchanged on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &PhoneLeadId) -> Result<(), ScreenError> {
        let result = self.remove(id).await;
        self.cell.settle(result)
    }

    async fn remove(&self, id: &PhoneLeadId) -> Result<(), ScreenError> {
        let _busy = self.cell.begin(id.as_str())?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .delete_phone_lead(Some(&credential), id)
            .await?;
        interpret(response, "Kunde inte radera telefonnumret.").await?;
        self.cell.apply(|leads| leads.retain(|lead| &lead.id != id));
        info!("Phone lead deleted");
        Ok(())
    }

    #[must_use]
    pub fn leads(&self) -> Vec<PhoneLead> {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
