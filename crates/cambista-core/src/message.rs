//! # Operator and Client Text
//!
//! Human-facing text built from a quote. All numbers use display formatting.

use chrono::NaiveDateTime;

use crate::format::to_display;
use crate::quote::{MarketInputs, QuoteResult};
use crate::record::ClientIdentity;
use crate::ticket::TicketCode;
use crate::{CURRENCY_TAG, OPERATION_TAG};

/// Values the client message needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientQuote<'a> {
    pub client: &'a ClientIdentity,
    pub brl_amount: f64,
    pub effective_brl_ars_rate: f64,
    pub total_ars: f64,
}

impl<'a> ClientQuote<'a> {
    pub fn new(client: &'a ClientIdentity, inputs: &MarketInputs, quote: &QuoteResult) -> Self {
        ClientQuote {
            client,
            brl_amount: inputs.brl_amount,
            effective_brl_ars_rate: quote.effective_brl_ars_rate,
            total_ars: quote.total_ars,
        }
    }
}

/// The quote message sent to the client.
pub fn client_message(quote: &ClientQuote<'_>) -> String {
    let amount = to_display(quote.brl_amount);
    format!(
        "\nEstimado/a {first} {last},\n\n\
         Agradecemos su consulta y le presentamos el detalle de su presupuesto para la compra de {amount} {cur}:\n\n\
         - *Moneda*: {cur}\n\
         - *Importe de la operación*: {amount} {cur}\n\
         - *Tipo de cambio {cur} a ARS*: {rate} ARS por {cur}\n\
         - *Total a recibir en pesos argentinos*: {total} ARS\n\n\
         Quedamos a su disposición para cualquier consulta adicional o para proceder con la operación.\n\n\
         Atentamente,\n\
         *Su equipo de operaciones*\n",
        first = quote.client.first_name,
        last = quote.client.last_name,
        amount = amount,
        cur = CURRENCY_TAG,
        rate = to_display(quote.effective_brl_ars_rate),
        total = to_display(quote.total_ars),
    )
}

/// One-line ticket: `TC010001 - 03/05 - Pérez Juan - COMPRA x BRL 1.000.`
pub fn ticket_line(
    ticket: &TicketCode,
    issued_at: NaiveDateTime,
    client: &ClientIdentity,
    brl_amount: f64,
) -> String {
    format!(
        "{} - {} - {} {} - {} x {} {}.",
        ticket,
        issued_at.format("%d/%m"),
        client.last_name,
        client.first_name,
        OPERATION_TAG,
        CURRENCY_TAG,
        to_display(brl_amount),
    )
}

/// Summary block for the operator's own records.
pub fn executive_summary(
    client: &ClientIdentity,
    inputs: &MarketInputs,
    quote: &QuoteResult,
) -> String {
    format!(
        "\nCODIGO: {}\nNOMBRE: {}\nAPELLIDO: {}\nENTREGAMOS: {} ARS\nRECIBIMOS: {} {}\nTC: {} ARS por {}\n",
        client.code,
        client.first_name,
        client.last_name,
        to_display(quote.total_ars),
        to_display(inputs.brl_amount),
        CURRENCY_TAG,
        to_display(quote.effective_brl_ars_rate),
        CURRENCY_TAG,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::compute;
    use crate::ticket::TicketCounter;
    use chrono::NaiveDate;

    fn fixture() -> (ClientIdentity, MarketInputs, QuoteResult) {
        let client = ClientIdentity::new(42, "pérez", "juan").unwrap();
        let inputs = MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0);
        let quote = compute(&inputs).unwrap();
        (client, inputs, quote)
    }

    #[test]
    fn test_client_message_values() {
        let (client, inputs, quote) = fixture();
        let message = client_message(&ClientQuote::new(&client, &inputs, &quote));

        assert!(message.contains("Estimado/a Juan Pérez,"));
        assert!(message.contains("presupuesto para la compra de 1.000 BRL:"));
        assert!(message.contains("- *Tipo de cambio BRL a ARS*: 200 ARS por BRL"));
        assert!(message.contains("- *Total a recibir en pesos argentinos*: 200.000 ARS"));
    }

    #[test]
    fn test_ticket_line() {
        let (client, inputs, _) = fixture();
        let ticket = TicketCode::new("TC", TicketCounter::new(1, 1).unwrap());
        let issued_at = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        assert_eq!(
            ticket_line(&ticket, issued_at, &client, inputs.brl_amount),
            "TC010001 - 03/05 - Pérez Juan - COMPRA x BRL 1.000."
        );
    }

    #[test]
    fn test_executive_summary() {
        let (client, inputs, quote) = fixture();
        let summary = executive_summary(&client, &inputs, &quote);

        assert!(summary.contains("CODIGO: 42\n"));
        assert!(summary.contains("ENTREGAMOS: 200.000 ARS\n"));
        assert!(summary.contains("RECIBIMOS: 1.000 BRL\n"));
        assert!(summary.contains("TC: 200 ARS por BRL\n"));
    }
}
