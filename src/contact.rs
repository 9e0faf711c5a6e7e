const WHATSAPP_BASE: &str = "https://wa.me/";

/// `https://wa.me/<digits>?text=<message>`.
///
/// wa.me only accepts the number in international form without `+`, spaces or
/// dashes, so everything that is not an ASCII digit is dropped.
pub fn whatsapp_link(phone_number: &str, message: &str) -> String {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    let encoded = urlencoding::encode(message);
    format!("{WHATSAPP_BASE}{digits}?text={encoded}")
}

pub fn mailto_link(address: &str) -> String {
    format!("mailto:{}", address.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_strips_number_formatting() {
        let link = whatsapp_link("+52 777 133 3155", "hi");
        assert_eq!(link, "https://wa.me/527771333155?text=hi");
    }

    #[test]
    fn whatsapp_message_is_percent_encoded() {
        let link = whatsapp_link("5215550000", "Hola! ¿Cómo estás? a&b=c");
        assert_eq!(
            link,
            "https://wa.me/5215550000?text=Hola%21%20%C2%BFC%C3%B3mo%20est%C3%A1s%3F%20a%26b%3Dc"
        );
    }

    #[test]
    fn whatsapp_link_has_a_single_query_parameter() {
        let link = whatsapp_link("+1 (555) 010-9999", "one two");
        let (_, query) = link.split_once('?').expect("query present");

        assert_eq!(query.split('&').count(), 1);
        assert!(query.starts_with("text="));
        assert!(link.starts_with("https://wa.me/15550109999?"));
    }

    #[test]
    fn mailto_trims_address() {
        assert_eq!(mailto_link(" someone@example.com "), "mailto:someone@example.com");
    }
}
