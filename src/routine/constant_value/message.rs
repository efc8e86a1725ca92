use crate::message::{MessageFields, MessageType, QcMessage};

/// Raised against each record of a run in which a value stayed constant for too long
///
/// The field value holds the elapsed minutes of the run and the valid value
/// holds the configured limit in minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantValueMessage {
    fields: MessageFields,
}

impl QcMessage for ConstantValueMessage {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn full_message(&self) -> String {
        format!(
            "The value in '{}' was constant for {} minutes (limit is {} minutes)",
            self.column_names_joined(),
            self.fields.field_value,
            self.fields.valid_value
        )
    }

    fn short_message(&self) -> String {
        format!("{} constant for too long", self.column_names_joined())
    }
}

impl MessageType for ConstantValueMessage {
    const TAG: &'static str = "ConstantValue";

    fn from_fields(fields: MessageFields) -> Self {
        Self { fields }
    }
}
