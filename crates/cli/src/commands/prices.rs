//! Price list commands.

use std::io;

use booking_console_admin::AppState;
use booking_console_admin::api::PriceList;
use booking_console_admin::screens::PriceScreen;

use super::CommandError;
use crate::render;

pub async fn show(state: &AppState, list: PriceList) -> Result<(), CommandError> {
    let screen = PriceScreen::new(state.clone(), list);
    screen.load().await?;
    render::prices(&mut io::stdout().lock(), list, &screen.values())?;
    Ok(())
}

/// Load the list, change the given fields and save every field.
pub async fn set(state: &AppState, list: PriceList, values: &[(String, String)]) -> Result<(), CommandError> {
    let screen = PriceScreen::new(state.clone(), list);
    screen.load().await?;

    for (key, value) in values {
        if !screen.set(key, value.as_str()) {
            let known: Vec<&str> = list.fields().iter().map(|f| f.key).collect();
            return Err(CommandError::Input(format!(
                "okänt pris {key:?}, förväntade ett av {}",
                known.join(", ")
            )));
        }
    }

    screen.save().await?;
    render::prices(&mut io::stdout().lock(), list, &screen.values())?;
    Ok(())
}
