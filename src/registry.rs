use std::collections::HashSet;

use smartstring::alias::{String as SmartString};

pub type LocationCode = SmartString;


/// ISO-3166 registry used for fuzzy country lookup: common short name and
/// alpha-3 code. Kosovo carries the user-assigned XKX code because the
/// upstream data reports it as a country.
pub static COUNTRY_REGISTRY: &[(&str, &str)] = &[
	("Afghanistan", "AFG"),
	("Aland Islands", "ALA"),
	("Albania", "ALB"),
	("Algeria", "DZA"),
	("American Samoa", "ASM"),
	("Andorra", "AND"),
	("Angola", "AGO"),
	("Anguilla", "AIA"),
	("Antarctica", "ATA"),
	("Antigua and Barbuda", "ATG"),
	("Argentina", "ARG"),
	("Armenia", "ARM"),
	("Aruba", "ABW"),
	("Australia", "AUS"),
	("Austria", "AUT"),
	("Azerbaijan", "AZE"),
	("Bahamas", "BHS"),
	("Bahrain", "BHR"),
	("Bangladesh", "BGD"),
	("Barbados", "BRB"),
	("Belarus", "BLR"),
	("Belgium", "BEL"),
	("Belize", "BLZ"),
	("Benin", "BEN"),
	("Bermuda", "BMU"),
	("Bhutan", "BTN"),
	("Bolivia", "BOL"),
	("Bonaire, Sint Eustatius and Saba", "BES"),
	("Bosnia and Herzegovina", "BIH"),
	("Botswana", "BWA"),
	("Bouvet Island", "BVT"),
	("Brazil", "BRA"),
	("British Indian Ocean Territory", "IOT"),
	("Brunei", "BRN"),
	("Bulgaria", "BGR"),
	("Burkina Faso", "BFA"),
	("Burundi", "BDI"),
	("Cabo Verde", "CPV"),
	("Cambodia", "KHM"),
	("Cameroon", "CMR"),
	("Canada", "CAN"),
	("Cayman Islands", "CYM"),
	("Central African Republic", "CAF"),
	("Chad", "TCD"),
	("Chile", "CHL"),
	("China", "CHN"),
	("Christmas Island", "CXR"),
	("Cocos Islands", "CCK"),
	("Colombia", "COL"),
	("Comoros", "COM"),
	("Congo", "COG"),
	("Congo, Democratic Republic of the", "COD"),
	("Cook Islands", "COK"),
	("Costa Rica", "CRI"),
	("Cote d'Ivoire", "CIV"),
	("Croatia", "HRV"),
	("Cuba", "CUB"),
	("Curacao", "CUW"),
	("Cyprus", "CYP"),
	("Czechia", "CZE"),
	("Denmark", "DNK"),
	("Djibouti", "DJI"),
	("Dominica", "DMA"),
	("Dominican Republic", "DOM"),
	("Ecuador", "ECU"),
	("Egypt", "EGY"),
	("El Salvador", "SLV"),
	("Equatorial Guinea", "GNQ"),
	("Eritrea", "ERI"),
	("Estonia", "EST"),
	("Eswatini", "SWZ"),
	("Ethiopia", "ETH"),
	("Falkland Islands", "FLK"),
	("Faroe Islands", "FRO"),
	("Fiji", "FJI"),
	("Finland", "FIN"),
	("France", "FRA"),
	("French Guiana", "GUF"),
	("French Polynesia", "PYF"),
	("French Southern Territories", "ATF"),
	("Gabon", "GAB"),
	("Gambia", "GMB"),
	("Georgia", "GEO"),
	("Germany", "DEU"),
	("Ghana", "GHA"),
	("Gibraltar", "GIB"),
	("Greece", "GRC"),
	("Greenland", "GRL"),
	("Grenada", "GRD"),
	("Guadeloupe", "GLP"),
	("Guam", "GUM"),
	("Guatemala", "GTM"),
	("Guernsey", "GGY"),
	("Guinea", "GIN"),
	("Guinea-Bissau", "GNB"),
	("Guyana", "GUY"),
	("Haiti", "HTI"),
	("Heard Island and McDonald Islands", "HMD"),
	("Holy See", "VAT"),
	("Honduras", "HND"),
	("Hong Kong", "HKG"),
	("Hungary", "HUN"),
	("Iceland", "ISL"),
	("India", "IND"),
	("Indonesia", "IDN"),
	("Iran", "IRN"),
	("Iraq", "IRQ"),
	("Ireland", "IRL"),
	("Isle of Man", "IMN"),
	("Israel", "ISR"),
	("Italy", "ITA"),
	("Jamaica", "JAM"),
	("Japan", "JPN"),
	("Jersey", "JEY"),
	("Jordan", "JOR"),
	("Kazakhstan", "KAZ"),
	("Kenya", "KEN"),
	("Kiribati", "KIR"),
	("Kosovo", "XKX"),
	("Kuwait", "KWT"),
	("Kyrgyzstan", "KGZ"),
	("Laos", "LAO"),
	("Latvia", "LVA"),
	("Lebanon", "LBN"),
	("Lesotho", "LSO"),
	("Liberia", "LBR"),
	("Libya", "LBY"),
	("Liechtenstein", "LIE"),
	("Lithuania", "LTU"),
	("Luxembourg", "LUX"),
	("Macao", "MAC"),
	("Madagascar", "MDG"),
	("Malawi", "MWI"),
	("Malaysia", "MYS"),
	("Maldives", "MDV"),
	("Mali", "MLI"),
	("Malta", "MLT"),
	("Marshall Islands", "MHL"),
	("Martinique", "MTQ"),
	("Mauritania", "MRT"),
	("Mauritius", "MUS"),
	("Mayotte", "MYT"),
	("Mexico", "MEX"),
	("Micronesia", "FSM"),
	("Moldova", "MDA"),
	("Monaco", "MCO"),
	("Mongolia", "MNG"),
	("Montenegro", "MNE"),
	("Montserrat", "MSR"),
	("Morocco", "MAR"),
	("Mozambique", "MOZ"),
	("Myanmar", "MMR"),
	("Namibia", "NAM"),
	("Nauru", "NRU"),
	("Nepal", "NPL"),
	("Netherlands", "NLD"),
	("New Caledonia", "NCL"),
	("New Zealand", "NZL"),
	("Nicaragua", "NIC"),
	("Niger", "NER"),
	("Nigeria", "NGA"),
	("Niue", "NIU"),
	("Norfolk Island", "NFK"),
	("North Korea", "PRK"),
	("North Macedonia", "MKD"),
	("Northern Mariana Islands", "MNP"),
	("Norway", "NOR"),
	("Oman", "OMN"),
	("Pakistan", "PAK"),
	("Palau", "PLW"),
	("Palestine", "PSE"),
	("Panama", "PAN"),
	("Papua New Guinea", "PNG"),
	("Paraguay", "PRY"),
	("Peru", "PER"),
	("Philippines", "PHL"),
	("Pitcairn", "PCN"),
	("Poland", "POL"),
	("Portugal", "PRT"),
	("Puerto Rico", "PRI"),
	("Qatar", "QAT"),
	("Reunion", "REU"),
	("Romania", "ROU"),
	("Russia", "RUS"),
	("Rwanda", "RWA"),
	("Saint Barthelemy", "BLM"),
	("Saint Helena", "SHN"),
	("Saint Kitts and Nevis", "KNA"),
	("Saint Lucia", "LCA"),
	("Saint Martin", "MAF"),
	("Saint Pierre and Miquelon", "SPM"),
	("Saint Vincent and the Grenadines", "VCT"),
	("Samoa", "WSM"),
	("San Marino", "SMR"),
	("Sao Tome and Principe", "STP"),
	("Saudi Arabia", "SAU"),
	("Senegal", "SEN"),
	("Serbia", "SRB"),
	("Seychelles", "SYC"),
	("Sierra Leone", "SLE"),
	("Singapore", "SGP"),
	("Sint Maarten", "SXM"),
	("Slovakia", "SVK"),
	("Slovenia", "SVN"),
	("Solomon Islands", "SLB"),
	("Somalia", "SOM"),
	("South Africa", "ZAF"),
	("South Georgia and the South Sandwich Islands", "SGS"),
	("South Korea", "KOR"),
	("South Sudan", "SSD"),
	("Spain", "ESP"),
	("Sri Lanka", "LKA"),
	("Sudan", "SDN"),
	("Suriname", "SUR"),
	("Svalbard and Jan Mayen", "SJM"),
	("Sweden", "SWE"),
	("Switzerland", "CHE"),
	("Syria", "SYR"),
	("Taiwan", "TWN"),
	("Tajikistan", "TJK"),
	("Tanzania", "TZA"),
	("Thailand", "THA"),
	("Timor-Leste", "TLS"),
	("Togo", "TGO"),
	("Tokelau", "TKL"),
	("Tonga", "TON"),
	("Trinidad and Tobago", "TTO"),
	("Tunisia", "TUN"),
	("Turkey", "TUR"),
	("Turkmenistan", "TKM"),
	("Turks and Caicos Islands", "TCA"),
	("Tuvalu", "TUV"),
	("Uganda", "UGA"),
	("Ukraine", "UKR"),
	("United Arab Emirates", "ARE"),
	("United Kingdom", "GBR"),
	("United States", "USA"),
	("United States Minor Outlying Islands", "UMI"),
	("Uruguay", "URY"),
	("Uzbekistan", "UZB"),
	("Vanuatu", "VUT"),
	("Venezuela", "VEN"),
	("Vietnam", "VNM"),
	("Virgin Islands, British", "VGB"),
	("Virgin Islands, U.S.", "VIR"),
	("Wallis and Futuna", "WLF"),
	("Western Sahara", "ESH"),
	("Yemen", "YEM"),
	("Zambia", "ZMB"),
	("Zimbabwe", "ZWE"),
];


/// Names the upstream data uses that a generic fuzzy match gets wrong or
/// that deliberately map to nothing. An entry with `None` means the name
/// denotes a non-territory (cruise ships, olympic delegations) and is
/// intentionally unmapped.
pub static COUNTRY_OVERRIDES: &[(&str, Option<&str>)] = &[
	("US", Some("USA")),
	("Korea, South", Some("KOR")),
	("Korea, North", Some("PRK")),
	("Burma", Some("MMR")),
	("Taiwan*", Some("TWN")),
	("West Bank and Gaza", Some("PSE")),
	("Holy See", Some("VAT")),
	("Cote d'Ivoire", Some("CIV")),
	("Cabo Verde", Some("CPV")),
	("Czechia", Some("CZE")),
	("Eswatini", Some("SWZ")),
	("Micronesia", Some("FSM")),
	("Kosovo", Some("XKX")),
	("Laos", Some("LAO")),
	("Timor-Leste", Some("TLS")),
	("Diamond Princess", None),
	("Grand Princess", None),
	("MS Zaandam", None),
	("Cruise Ship", None),
	("Summer Olympics 2020", None),
	("Winter Olympics 2022", None),
];

/// Alpha-3 code of the Democratic Republic of the Congo, applied to every
/// name whose first token is "Congo" (the upstream data spells its two
/// Congo entries inconsistently between files).
pub static CONGO_CODE: &str = "COD";


/// The exhaustive state/territory table: 50 states, DC and the inhabited
/// territories, as spelled in the `Province_State` column.
pub static US_STATES: &[(&str, &str)] = &[
	("Alabama", "AL"),
	("Alaska", "AK"),
	("American Samoa", "AS"),
	("Arizona", "AZ"),
	("Arkansas", "AR"),
	("California", "CA"),
	("Colorado", "CO"),
	("Connecticut", "CT"),
	("Delaware", "DE"),
	("District of Columbia", "DC"),
	("Florida", "FL"),
	("Georgia", "GA"),
	("Guam", "GU"),
	("Hawaii", "HI"),
	("Idaho", "ID"),
	("Illinois", "IL"),
	("Indiana", "IN"),
	("Iowa", "IA"),
	("Kansas", "KS"),
	("Kentucky", "KY"),
	("Louisiana", "LA"),
	("Maine", "ME"),
	("Maryland", "MD"),
	("Massachusetts", "MA"),
	("Michigan", "MI"),
	("Minnesota", "MN"),
	("Mississippi", "MS"),
	("Missouri", "MO"),
	("Montana", "MT"),
	("Nebraska", "NE"),
	("Nevada", "NV"),
	("New Hampshire", "NH"),
	("New Jersey", "NJ"),
	("New Mexico", "NM"),
	("New York", "NY"),
	("North Carolina", "NC"),
	("North Dakota", "ND"),
	("Northern Mariana Islands", "MP"),
	("Ohio", "OH"),
	("Oklahoma", "OK"),
	("Oregon", "OR"),
	("Pennsylvania", "PA"),
	("Puerto Rico", "PR"),
	("Rhode Island", "RI"),
	("South Carolina", "SC"),
	("South Dakota", "SD"),
	("Tennessee", "TN"),
	("Texas", "TX"),
	("Utah", "UT"),
	("Vermont", "VT"),
	("Virgin Islands", "VI"),
	("Virginia", "VA"),
	("Washington", "WA"),
	("West Virginia", "WV"),
	("Wisconsin", "WI"),
	("Wyoming", "WY"),
];


pub fn known_countries() -> HashSet<LocationCode> {
	COUNTRY_REGISTRY.iter().map(|(_, code)| LocationCode::from(*code)).collect()
}

pub fn known_states() -> HashSet<LocationCode> {
	US_STATES.iter().map(|(_, code)| LocationCode::from(*code)).collect()
}

pub fn state_code(name: &str) -> Option<&'static str> {
	US_STATES.iter().find(|(n, _)| *n == name).map(|(_, code)| *code)
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registry_codes_are_alpha3() {
		for (name, code) in COUNTRY_REGISTRY {
			assert_eq!(code.len(), 3, "bad code {:?} for {:?}", code, name);
			assert!(code.chars().all(|c| c.is_ascii_uppercase()));
		}
	}

	#[test]
	fn registry_codes_are_unique() {
		let known = known_countries();
		assert_eq!(known.len(), COUNTRY_REGISTRY.len());
	}

	#[test]
	fn override_targets_exist_in_registry() {
		let known = known_countries();
		for (name, code) in COUNTRY_OVERRIDES {
			if let Some(code) = code {
				assert!(known.contains(*code), "override {:?} -> {:?} not in registry", name, code);
			}
		}
	}

	#[test]
	fn state_table_is_exhaustive() {
		assert_eq!(US_STATES.len(), 56);
		assert_eq!(state_code("New York"), Some("NY"));
		assert_eq!(state_code("District of Columbia"), Some("DC"));
		assert_eq!(state_code("Diamond Princess"), None);
	}
}
