//! pain.001 CustomerCreditTransferInitiation
//!
//! Document model for the subset of pain.001.001.03 the office exchanges
//! with its bank: one debtor (the union's own account) per payment block,
//! any number of credit transfer transactions. The same model serves both
//! directions, generation via [`Pain001Builder`] and settlement-metadata
//! extraction from uploaded documents via [`Pain001Document::settlement_metadata`].

use crate::config::InitiatorConfig;
use crate::error::{Error, Result};
use crate::export::SepaExport;
use bursary_core::{Bic, Iban};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// pain.001 Document root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Document")]
pub struct Pain001Document {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "CstmrCdtTrfInitn")]
    pub customer_credit_transfer_initiation: CustomerCreditTransferInitiation,
}

/// Customer Credit Transfer Initiation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreditTransferInitiation {
    #[serde(rename = "GrpHdr")]
    pub group_header: GroupHeader,
    #[serde(rename = "PmtInf", default)]
    pub payment_information: Vec<PaymentInformation>,
}

/// Group Header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeader {
    #[serde(rename = "MsgId")]
    pub message_id: String,
    #[serde(rename = "CreDtTm")]
    pub creation_date_time: NaiveDateTime,
    #[serde(rename = "NbOfTxs")]
    pub number_of_transactions: String,
    #[serde(rename = "CtrlSum", skip_serializing_if = "Option::is_none")]
    pub control_sum: Option<String>,
    #[serde(rename = "InitgPty", skip_serializing_if = "Option::is_none")]
    pub initiating_party: Option<PartyIdentification>,
}

/// Party identification (name only in this subset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyIdentification {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Payment Information block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInformation {
    #[serde(rename = "PmtInfId")]
    pub payment_information_id: String,
    #[serde(rename = "PmtMtd")]
    pub payment_method: String,
    #[serde(rename = "NbOfTxs", skip_serializing_if = "Option::is_none")]
    pub number_of_transactions: Option<String>,
    #[serde(rename = "CtrlSum", skip_serializing_if = "Option::is_none")]
    pub control_sum: Option<String>,
    #[serde(rename = "ReqdExctnDt", skip_serializing_if = "Option::is_none")]
    pub requested_execution_date: Option<NaiveDate>,
    #[serde(rename = "Dbtr", skip_serializing_if = "Option::is_none")]
    pub debtor: Option<PartyIdentification>,
    #[serde(rename = "DbtrAcct")]
    pub debtor_account: CashAccount,
    #[serde(rename = "DbtrAgt")]
    pub debtor_agent: Agent,
    #[serde(rename = "CdtTrfTxInf")]
    pub credit_transfer_transactions: Vec<CreditTransferTransactionInformation>,
}

/// Cash account, IBAN-identified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccount {
    #[serde(rename = "Id")]
    pub id: AccountIdentification,
}

/// Account identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentification {
    #[serde(rename = "IBAN")]
    pub iban: String,
}

/// Financial institution agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "FinInstnId")]
    pub financial_institution_identification: FinancialInstitutionIdentification,
}

/// Financial institution identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentification {
    #[serde(rename = "BIC")]
    pub bic: String,
}

/// Credit Transfer Transaction Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransferTransactionInformation {
    #[serde(rename = "PmtId")]
    pub payment_identification: PaymentIdentification,
    #[serde(rename = "Amt")]
    pub amount: AmountType,
    #[serde(rename = "CdtrAgt", skip_serializing_if = "Option::is_none")]
    pub creditor_agent: Option<Agent>,
    #[serde(rename = "Cdtr")]
    pub creditor: PartyIdentification,
    #[serde(rename = "CdtrAcct")]
    pub creditor_account: CashAccount,
    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    pub remittance_information: Option<RemittanceInformation>,
}

/// Payment identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdentification {
    #[serde(rename = "EndToEndId")]
    pub end_to_end_id: String,
}

/// Amount wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountType {
    #[serde(rename = "InstdAmt")]
    pub instructed_amount: CurrencyAndAmount,
}

/// Currency-qualified amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyAndAmount {
    #[serde(rename = "@Ccy")]
    pub currency: String,
    #[serde(rename = "$text")]
    pub value: Decimal,
}

/// Remittance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceInformation {
    #[serde(rename = "Ustrd", skip_serializing_if = "Option::is_none")]
    pub unstructured: Option<Vec<String>>,
}

/// Settlement metadata read from an uploaded pain.001 document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementMetadata {
    /// Group header message ID
    pub message_id: String,
    /// Number of transactions in the document
    pub payment_count: u32,
    /// Control sum in minor units (cents)
    pub control_sum_cents: i64,
    /// Debtor account of the initiating party
    pub initiator_iban: Iban,
    /// Debtor agent of the initiating party
    pub initiator_bic: Bic,
}

/// Parse a pain.001 XML document
pub fn parse(xml: &str) -> Result<Pain001Document> {
    quick_xml::de::from_str(xml)
        .map_err(|e| Error::Parse(format!("pain.001 document rejected: {}", e)))
}

/// Control sum in minor units.
///
/// The bank's documents always carry two fraction digits, so deleting the
/// separator is exact: `"1234.56"` becomes `123456`. Control sums with a
/// different scale are out of contract.
pub fn control_sum_cents(value: &str) -> Result<i64> {
    let digits = value.trim().replace('.', "");
    digits
        .parse()
        .map_err(|_| Error::Parse(format!("control sum '{}' is not numeric", value)))
}

impl Pain001Document {
    /// Serialize to XML with declaration
    pub fn to_xml(&self) -> Result<String> {
        let xml = quick_xml::se::to_string(self)
            .map_err(|e| Error::Xml(format!("XML serialization failed: {}", e)))?;
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
            xml
        ))
    }

    /// Extract settlement metadata.
    ///
    /// Requires `GrpHdr/{MsgId,NbOfTxs,CtrlSum}` and the debtor
    /// account/agent of the first payment block.
    pub fn settlement_metadata(&self) -> Result<SettlementMetadata> {
        let header = &self.customer_credit_transfer_initiation.group_header;

        let control_sum = header
            .control_sum
            .as_deref()
            .ok_or_else(|| Error::Parse("GrpHdr/CtrlSum missing".to_string()))?;

        let payment_count = header.number_of_transactions.trim().parse().map_err(|_| {
            Error::Parse(format!(
                "GrpHdr/NbOfTxs '{}' is not a count",
                header.number_of_transactions
            ))
        })?;

        let payment_info = self
            .customer_credit_transfer_initiation
            .payment_information
            .first()
            .ok_or_else(|| Error::Parse("PmtInf missing".to_string()))?;

        Ok(SettlementMetadata {
            message_id: header.message_id.clone(),
            payment_count,
            control_sum_cents: control_sum_cents(control_sum)?,
            initiator_iban: Iban::new(&payment_info.debtor_account.id.iban),
            initiator_bic: Bic::new(
                &payment_info
                    .debtor_agent
                    .financial_institution_identification
                    .bic,
            ),
        })
    }
}

/// One credit transfer in a generated document
#[derive(Debug, Clone)]
pub struct PaymentInstruction {
    /// Creditor name
    pub creditor_name: String,
    /// Creditor account
    pub creditor_iban: Iban,
    /// Creditor agent, omitted for IBAN-only transfers
    pub creditor_bic: Option<Bic>,
    /// Transfer amount in euro
    pub amount: Decimal,
    /// End-to-end reference
    pub end_to_end_id: String,
    /// Unstructured remittance line
    pub remittance_info: Option<String>,
}

/// Builder for pain.001 documents
#[derive(Debug, Clone)]
pub struct Pain001Builder {
    message_id: String,
    initiator: InitiatorConfig,
    creation_date_time: NaiveDateTime,
    requested_execution_date: Option<NaiveDate>,
    payments: Vec<PaymentInstruction>,
}

impl Pain001Builder {
    /// Start a document for the given initiator
    pub fn new(message_id: impl Into<String>, initiator: InitiatorConfig) -> Self {
        Self {
            message_id: message_id.into(),
            initiator,
            creation_date_time: Utc::now().naive_utc(),
            requested_execution_date: None,
            payments: Vec::new(),
        }
    }

    /// Override the creation timestamp
    pub fn with_creation_time(mut self, creation_date_time: NaiveDateTime) -> Self {
        self.creation_date_time = creation_date_time;
        self
    }

    /// Set the requested execution date
    pub fn with_execution_date(mut self, date: NaiveDate) -> Self {
        self.requested_execution_date = Some(date);
        self
    }

    /// Append a credit transfer
    pub fn add_payment(mut self, payment: PaymentInstruction) -> Self {
        self.payments.push(payment);
        self
    }

    /// Assemble the document, computing transaction count and control sum
    pub fn build(self) -> Pain001Document {
        let count = self.payments.len();
        let control_sum: Decimal = self.payments.iter().map(|p| p.amount).sum();

        let transactions = self
            .payments
            .into_iter()
            .map(|payment| CreditTransferTransactionInformation {
                payment_identification: PaymentIdentification {
                    end_to_end_id: payment.end_to_end_id,
                },
                amount: AmountType {
                    instructed_amount: CurrencyAndAmount {
                        currency: "EUR".to_string(),
                        value: payment.amount,
                    },
                },
                creditor_agent: payment.creditor_bic.map(|bic| Agent {
                    financial_institution_identification: FinancialInstitutionIdentification {
                        bic: bic.as_str().to_string(),
                    },
                }),
                creditor: PartyIdentification {
                    name: Some(payment.creditor_name),
                },
                creditor_account: CashAccount {
                    id: AccountIdentification {
                        iban: payment.creditor_iban.as_str().to_string(),
                    },
                },
                remittance_information: payment
                    .remittance_info
                    .map(|line| RemittanceInformation {
                        unstructured: Some(vec![line]),
                    }),
            })
            .collect();

        let payment_information = PaymentInformation {
            payment_information_id: format!("{}-1", self.message_id),
            payment_method: "TRF".to_string(),
            number_of_transactions: Some(count.to_string()),
            control_sum: Some(format!("{:.2}", control_sum)),
            requested_execution_date: self.requested_execution_date,
            debtor: Some(PartyIdentification {
                name: Some(self.initiator.name.clone()),
            }),
            debtor_account: CashAccount {
                id: AccountIdentification {
                    iban: self.initiator.iban.as_str().to_string(),
                },
            },
            debtor_agent: Agent {
                financial_institution_identification: FinancialInstitutionIdentification {
                    bic: self.initiator.bic.as_str().to_string(),
                },
            },
            credit_transfer_transactions: transactions,
        };

        Pain001Document {
            xmlns: "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03".to_string(),
            customer_credit_transfer_initiation: CustomerCreditTransferInitiation {
                group_header: GroupHeader {
                    message_id: self.message_id,
                    creation_date_time: self.creation_date_time,
                    number_of_transactions: count.to_string(),
                    control_sum: Some(format!("{:.2}", control_sum)),
                    initiating_party: Some(PartyIdentification {
                        name: Some(self.initiator.name),
                    }),
                },
                payment_information: vec![payment_information],
            },
        }
    }
}

/// Writes generated pain.001 documents as export files
#[derive(Debug, Clone)]
pub struct Pain001Generator {
    config: crate::Config,
}

impl Pain001Generator {
    /// Create a generator over the given configuration
    pub fn new(config: crate::Config) -> Self {
        Self { config }
    }

    /// Generate a document for the payments and write it under the output
    /// directory, returning the export record pointing at the file.
    pub fn generate(
        &self,
        description: &str,
        created_at: DateTime<Utc>,
        payments: &[PaymentInstruction],
    ) -> Result<SepaExport> {
        if payments.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot generate a pain.001 document without payments".to_string(),
            ));
        }

        std::fs::create_dir_all(&self.config.output_dir)?;

        let message_id = format!(
            "{}-{}",
            self.config.message_id_prefix,
            created_at.format("%Y%m%d-%H%M%S")
        );

        let mut builder = Pain001Builder::new(message_id, self.config.initiator.clone())
            .with_creation_time(created_at.naive_utc())
            .with_execution_date(created_at.date_naive());
        for payment in payments {
            builder = builder.add_payment(payment.clone());
        }

        let xml = builder.build().to_xml()?;

        let filename = format!(
            "{}_{}.xml",
            description,
            created_at.format("%Y-%m-%d-%H%M%S")
        );
        let path = self.config.output_dir.join(&filename);
        std::fs::write(&path, xml)?;

        tracing::info!(file = %path.display(), "generated pain.001 export");

        Ok(SepaExport::new(description, created_at).with_xml_file(path))
    }
}
