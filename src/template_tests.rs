// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for template expansion

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::dns_errors::TemplateError;
    use crate::template::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_expand_single_variable() {
        let out = expand_template("projects/{{project}}/x", &vars(&[("project", "p1")])).unwrap();
        assert_eq!(out, "projects/p1/x");
    }

    #[test]
    fn test_missing_variable_expands_to_empty() {
        let out = expand_template("projects/{{project}}/x", &HashMap::new()).unwrap();
        assert_eq!(out, "projects//x");
    }

    #[test]
    fn test_nested_variable_resolves_on_next_round() {
        let v = vars(&[("zone_path", "zones/{{zone}}"), ("zone", "prod")]);
        assert_eq!(expand_template("{{zone_path}}/rrsets", &v).unwrap(), "zones/prod/rrsets");
    }

    #[test]
    fn test_template_without_tokens_is_unchanged() {
        assert_eq!(
            expand_template("plain/path", &HashMap::new()).unwrap(),
            "plain/path"
        );
    }

    #[test]
    fn test_self_referential_variable_hits_recursion_limit() {
        let v = vars(&[("project", "{{project}}")]);
        let err = expand_template("projects/{{project}}", &v).unwrap_err();
        assert_eq!(
            err,
            TemplateError::RecursionLimitExceeded {
                template: "projects/{{project}}".to_string(),
                rounds: 10,
            }
        );
    }

    #[test]
    fn test_mutually_recursive_variables_hit_recursion_limit() {
        let v = vars(&[("a", "{{b}}"), ("b", "{{a}}")]);
        assert!(expand_template("{{a}}", &v).is_err());
    }

    #[test]
    fn test_convert_self_link_to_v1() {
        assert_eq!(
            convert_self_link_to_v1("https://www.googleapis.com/compute/beta/projects/p/global/networks/n"),
            "https://www.googleapis.com/compute/v1/projects/p/global/networks/n"
        );
        assert_eq!(
            convert_self_link_to_v1("https://example.com/other/path"),
            "https://example.com/other/path"
        );
    }

    #[test]
    fn test_network_resolver_bare_name() {
        let resolver =
            NetworkUrlResolver::new("https://compute.googleapis.com/compute/v1/", "my-project");
        assert_eq!(
            resolver.resolve("default").unwrap(),
            "https://compute.googleapis.com/compute/v1/projects/my-project/global/networks/default"
        );
    }

    #[test]
    fn test_network_resolver_relative_path() {
        let resolver =
            NetworkUrlResolver::new("https://compute.googleapis.com/compute/v1/", "my-project");
        assert_eq!(
            resolver.resolve("projects/other/global/networks/shared").unwrap(),
            "https://compute.googleapis.com/compute/v1/projects/other/global/networks/shared"
        );
    }

    #[test]
    fn test_network_resolver_absolute_url_is_verbatim() {
        let resolver =
            NetworkUrlResolver::new("https://compute.googleapis.com/compute/v1/", "my-project");
        let url = "https://www.googleapis.com/compute/beta/projects/x/global/networks/y";
        assert_eq!(resolver.resolve(url).unwrap(), url);
    }

    #[test]
    fn test_network_resolver_custom_base_is_normalized_to_v1() {
        let resolver = NetworkUrlResolver::new("http://127.0.0.1:9000/compute/beta/", "p");
        assert_eq!(
            resolver.resolve("net").unwrap(),
            "http://127.0.0.1:9000/compute/v1/projects/p/global/networks/net"
        );
    }

    #[test]
    fn test_network_resolver_empty() {
        let resolver = NetworkUrlResolver::new("https://compute.googleapis.com/compute/v1/", "p");
        assert_eq!(resolver.resolve("").unwrap(), "");
    }
}
