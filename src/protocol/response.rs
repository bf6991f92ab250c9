use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::loan::Loan;

const ENVELOPE_NAMESPACE: &str = "http://example.com/loan";

/// 成功応答エンベロープを組み立てる
///
/// 本文は `<success>true</success>`、任意の `<message>`、0件以上の
/// `<loan>` レコードからなる。
pub fn success(operation: &str, message: Option<&str>, loans: &[Loan]) -> String {
    let mut inner = String::from("\n      <success>true</success>");
    if let Some(message) = message {
        inner.push_str(&format!(
            "\n      <message>{}</message>",
            xml_escape(message)
        ));
    }
    for loan in loans {
        inner.push_str(&loan_fragment(loan));
    }
    wrap_response(operation, &inner)
}

/// 失敗応答エンベロープを組み立てる
///
/// Faultとは異なり、操作自体は処理されたが業務上の結果が否定で
/// あったことを表す。機械可読の `<code>` と人間向けの `<message>` を
/// 併せて運ぶ。
pub fn failure(operation: &str, code: &str, message: &str) -> String {
    let inner = format!(
        "\n      <success>false</success>\n      <code>{}</code>\n      <message>{}</message>",
        xml_escape(code),
        xml_escape(message)
    );
    wrap_response(operation, &inner)
}

/// Faultエンベロープを組み立てる
///
/// デコード不能な要求に対する応答で、サーバエラー系のHTTP
/// ステータスと対で返される。
pub fn fault(message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>{}</faultstring>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#,
        xml_escape(message)
    )
}

fn wrap_response(operation: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{operation}Response xmlns="{namespace}">{inner}
    </{operation}Response>
  </soap:Body>
</soap:Envelope>"#,
        operation = operation,
        namespace = ENVELOPE_NAMESPACE,
        inner = inner,
    )
}

/// 貸出レコードのXML断片
///
/// 6フィールドすべてをテキストとして直列化する。`return_date` の
/// 欠落は空要素として表現する。
fn loan_fragment(loan: &Loan) -> String {
    let return_date = loan.return_date.map(format_timestamp).unwrap_or_default();

    format!(
        r#"
      <loan>
        <id>{id}</id>
        <userId>{user_id}</userId>
        <bookId>{book_id}</bookId>
        <loanDate>{loan_date}</loanDate>
        <dueDate>{due_date}</dueDate>
        <returnDate>{return_date}</returnDate>
        <status>{status}</status>
      </loan>"#,
        id = loan.id.value(),
        user_id = loan.user_id.value(),
        book_id = loan.book_id.value(),
        loan_date = format_timestamp(loan.loan_date),
        due_date = format_timestamp(loan.due_date),
        return_date = return_date,
        status = loan.status.as_str(),
    )
}

/// ISO-8601（RFC 3339、秒精度、UTC）のタイムスタンプ表現
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// XML特殊文字のエスケープ
pub(crate) fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
