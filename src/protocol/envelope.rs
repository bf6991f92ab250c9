use thiserror::Error;

/// 要求エンベロープから取り出された操作
///
/// 固定の操作集合に対するタグ付きバリアント。パラメータの欠落は
/// ここではエラーにせず、欠落値のままオーケストレーションエンジンに
/// 渡す（必須判定はエンジンの責務）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    CreateLoan {
        user_id: Option<String>,
        book_id: Option<String>,
    },
    ReturnLoan {
        loan_id: Option<String>,
    },
    GetLoansByUser {
        user_id: Option<String>,
    },
    GetLoanById {
        loan_id: Option<String>,
    },
    GetAllLoans,
}

impl OperationRequest {
    /// ワイヤ上の操作名
    pub fn operation_name(&self) -> &'static str {
        match self {
            OperationRequest::CreateLoan { .. } => "createLoan",
            OperationRequest::ReturnLoan { .. } => "returnLoan",
            OperationRequest::GetLoansByUser { .. } => "getLoansByUser",
            OperationRequest::GetLoanById { .. } => "getLoanById",
            OperationRequest::GetAllLoans => "getAllLoans",
        }
    }
}

/// デコード失敗
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// 既知の操作名が本文に含まれない
    #[error("Unknown operation")]
    UnknownOperation,
}

/// 操作名の優先順
///
/// 本文への出現検査はこの順で行い、最初に見つかった操作を採用する。
const OPERATIONS: [&str; 5] = [
    "createLoan",
    "returnLoan",
    "getLoansByUser",
    "getLoanById",
    "getAllLoans",
];

/// 要求エンベロープの本文を操作バリアントへデコードする
pub fn decode(body: &str) -> Result<OperationRequest, DecodeError> {
    let operation = OPERATIONS
        .iter()
        .find(|name| body.contains(**name))
        .ok_or(DecodeError::UnknownOperation)?;

    let request = match *operation {
        "createLoan" => OperationRequest::CreateLoan {
            user_id: extract_param(body, "userId"),
            book_id: extract_param(body, "bookId"),
        },
        "returnLoan" => OperationRequest::ReturnLoan {
            loan_id: extract_param(body, "loanId"),
        },
        "getLoansByUser" => OperationRequest::GetLoansByUser {
            user_id: extract_param(body, "userId"),
        },
        "getLoanById" => OperationRequest::GetLoanById {
            loan_id: extract_param(body, "loanId"),
        },
        _ => OperationRequest::GetAllLoans,
    };

    Ok(request)
}

/// 最初の `<tag>…</tag>` 対の内側テキストを取り出す
///
/// タグが存在しない場合と内側が空白のみの場合はどちらも欠落として
/// 扱う。空の `returnDate` 要素を「値あり」と誤読しないための規約と
/// 同じ扱いをパラメータにも適用する。
pub(crate) fn extract_param(body: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;

    let inner = body[start..end].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_create_loan_with_parameters() {
        let body = "<soap:Envelope><soap:Body><createLoanRequest>\
                    <userId>42</userId><bookId>7</bookId>\
                    </createLoanRequest></soap:Body></soap:Envelope>";

        let request = decode(body).unwrap();
        assert_eq!(
            request,
            OperationRequest::CreateLoan {
                user_id: Some("42".to_string()),
                book_id: Some("7".to_string()),
            }
        );
    }

    #[test]
    fn test_decode_each_operation() {
        assert_eq!(
            decode("<returnLoanRequest><loanId>100</loanId></returnLoanRequest>").unwrap(),
            OperationRequest::ReturnLoan {
                loan_id: Some("100".to_string())
            }
        );
        assert_eq!(
            decode("<getLoansByUserRequest><userId>42</userId></getLoansByUserRequest>").unwrap(),
            OperationRequest::GetLoansByUser {
                user_id: Some("42".to_string())
            }
        );
        assert_eq!(
            decode("<getLoanByIdRequest><loanId>5</loanId></getLoanByIdRequest>").unwrap(),
            OperationRequest::GetLoanById {
                loan_id: Some("5".to_string())
            }
        );
        assert_eq!(
            decode("<getAllLoansRequest/>").unwrap(),
            OperationRequest::GetAllLoans
        );
    }

    #[test]
    fn test_operation_selection_follows_priority_order() {
        // 両方の操作名が出現する場合は優先順で先の createLoan が選ばれる
        let body = "<note>returnLoan</note><createLoanRequest>\
                    <userId>1</userId><bookId>2</bookId></createLoanRequest>";

        let request = decode(body).unwrap();
        assert_eq!(request.operation_name(), "createLoan");
    }

    #[test]
    fn test_missing_parameters_decode_to_absent() {
        let request = decode("<createLoanRequest><userId>42</userId></createLoanRequest>").unwrap();
        assert_eq!(
            request,
            OperationRequest::CreateLoan {
                user_id: Some("42".to_string()),
                book_id: None,
            }
        );
    }

    #[test]
    fn test_empty_element_decodes_to_absent() {
        // 空要素は空文字列ではなく欠落
        let request = decode("<returnLoanRequest><loanId></loanId></returnLoanRequest>").unwrap();
        assert_eq!(request, OperationRequest::ReturnLoan { loan_id: None });
    }

    #[test]
    fn test_extract_param_takes_first_match() {
        let body = "<loanId>1</loanId><loanId>2</loanId>";
        assert_eq!(extract_param(body, "loanId"), Some("1".to_string()));
    }

    #[test]
    fn test_extract_param_trims_surrounding_whitespace() {
        let body = "<userId>\n  42\n</userId>";
        assert_eq!(extract_param(body, "userId"), Some("42".to_string()));
    }

    #[test]
    fn test_unknown_operation_is_a_decode_error() {
        let body = "<soap:Envelope><soap:Body><purgeLoans/></soap:Body></soap:Envelope>";
        assert_eq!(decode(body), Err(DecodeError::UnknownOperation));
    }
}
