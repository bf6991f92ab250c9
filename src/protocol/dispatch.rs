use crate::application::loan::{self, LoanServiceError, ServiceDependencies};
use crate::domain::loan::Loan;

use super::envelope::{self, OperationRequest};
use super::response;

/// プロトコル層の最終出力
///
/// `is_fault` はデコード不能な要求に対するFault応答を示し、
/// トランスポート層でサーバエラー系のステータスに対応付けられる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub body: String,
    pub is_fault: bool,
}

impl WireResponse {
    fn ok(body: String) -> Self {
        Self {
            body,
            is_fault: false,
        }
    }

    fn fault(body: String) -> Self {
        Self {
            body,
            is_fault: true,
        }
    }
}

/// 1件の要求エンベロープを処理して応答エンベロープを返す
///
/// デコード・実行・エンコードのどこで失敗しても必ずエンベロープを
/// 返す。この関数から呼び出し側へエラーは伝播しない。
/// リトライは行わず、要求間に状態も持たない。
pub async fn handle_request(deps: &ServiceDependencies, body: &str) -> WireResponse {
    let request = match envelope::decode(body) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode request envelope");
            return WireResponse::fault(response::fault(&err.to_string()));
        }
    };

    tracing::debug!(operation = request.operation_name(), "dispatching operation");

    let encoded = match request {
        OperationRequest::CreateLoan { user_id, book_id } => encode_single(
            "createLoan",
            loan::create_loan(deps, user_id.as_deref(), book_id.as_deref()).await,
        ),
        OperationRequest::ReturnLoan { loan_id } => encode_single(
            "returnLoan",
            loan::return_loan(deps, loan_id.as_deref()).await,
        ),
        OperationRequest::GetLoanById { loan_id } => encode_single(
            "getLoanById",
            loan::get_loan(deps, loan_id.as_deref()).await,
        ),
        OperationRequest::GetLoansByUser { user_id } => encode_many(
            "getLoansByUser",
            loan::get_loans_by_user(deps, user_id.as_deref()).await,
        ),
        OperationRequest::GetAllLoans => encode_many("getAllLoans", loan::list_loans(deps).await),
    };

    WireResponse::ok(encoded)
}

/// 単一の貸出を返す操作の結果をエンコードする
fn encode_single(operation: &str, result: Result<Loan, LoanServiceError>) -> String {
    match result {
        Ok(loan) => response::success(operation, None, std::slice::from_ref(&loan)),
        Err(err) => encode_error(operation, &err),
    }
}

/// 貸出の列を返す操作の結果をエンコードする
fn encode_many(operation: &str, result: Result<Vec<Loan>, LoanServiceError>) -> String {
    match result {
        Ok(loans) => response::success(operation, None, &loans),
        Err(err) => encode_error(operation, &err),
    }
}

/// エンジンのエラーを失敗応答へ落とす
///
/// エラー種別はここで初めて機械可読コードと文字列に変換される。
fn encode_error(operation: &str, err: &LoanServiceError) -> String {
    tracing::debug!(
        operation,
        code = err.kind().code(),
        error = %err,
        "operation failed"
    );
    response::failure(operation, err.kind().code(), &err.to_string())
}
