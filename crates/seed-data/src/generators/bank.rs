//! Curated bank account fixtures.

use certstore::model::{AuditStamp, Partition, Record, RecordId};
use time::OffsetDateTime;

use crate::generators::audit::fixture_stamp;

/// Generated bank account data ready for the batch writer.
#[derive(Debug, Clone)]
pub struct GeneratedBankAccount {
    pub id: RecordId,
    pub bank_name: String,
    pub branch_name: String,
    pub deposit_type: String,
    pub account_number: String,
    pub account_holder: String,
    pub memo: Option<String>,
    pub audit: AuditStamp,
}

impl GeneratedBankAccount {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::BankAccount, self.id);
        record.set_str("bankName", self.bank_name.clone());
        record.set_str("branchName", self.branch_name.clone());
        record.set_str("depositType", self.deposit_type.clone());
        record.set_str("accountNumber", self.account_number.clone());
        record.set_str("accountHolder", self.account_holder.clone());
        record.set_opt_str("memo", self.memo.clone());
        self.audit.write_to(&mut record);
        record
    }
}

const ACCOUNTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "三菱UFJ銀行",
        "渋谷支店",
        "普通",
        "1234567",
        "一般財団法人 職業技能振興会",
    ),
    (
        "三井住友銀行",
        "新宿西口支店",
        "普通",
        "7654321",
        "ザイ）ショクギョウギノウシンコウカイ",
    ),
    (
        "みずほ銀行",
        "銀座中央支店",
        "当座",
        "0112233",
        "一般財団法人 職業技能振興会",
    ),
    (
        "ゆうちょ銀行",
        "〇一八支店",
        "普通",
        "10180-12345671",
        "職業技能振興会",
    ),
    (
        "楽天銀行",
        "第一営業支店",
        "普通",
        "7009988",
        "ザイ）ショクギョウギノウシンコウカイ",
    ),
];

/// Returns the curated list of five accounts, stamped at `now`.
pub fn bank_account_fixtures(now: OffsetDateTime) -> Vec<GeneratedBankAccount> {
    ACCOUNTS
        .iter()
        .map(
            |&(bank_name, branch_name, deposit_type, account_number, account_holder)| {
                GeneratedBankAccount {
                    id: RecordId::new(),
                    bank_name: bank_name.to_string(),
                    branch_name: branch_name.to_string(),
                    deposit_type: deposit_type.to_string(),
                    account_number: account_number.to_string(),
                    account_holder: account_holder.to_string(),
                    memo: None,
                    audit: fixture_stamp(now),
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_five_accounts_with_unique_ids() {
        let accounts = bank_account_fixtures(OffsetDateTime::now_utc());
        assert_eq!(accounts.len(), 5);

        let ids: HashSet<_> = accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_unset_memo_is_omitted_from_the_record() {
        let accounts = bank_account_fixtures(OffsetDateTime::now_utc());
        let record = accounts[0].to_record();
        assert!(record.get("memo").is_none());
        assert!(!record.str_field("bankName").unwrap_or("").is_empty());
    }
}
